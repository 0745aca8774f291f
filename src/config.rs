use anyhow::{Context, Result};
use blockmotion_physics::{
    BlockCell, DVec3, InvalidHalfExtents, LookupPolicy, MovementParams, PlayerBody,
};
use blockmotion_world::{BlockKind, VoxelGrid};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, warn};

pub const DEFAULT_SCENARIO_PATH: &str = "config/scenario.toml";

/// Everything a headless run needs, read from one TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub movement: MovementParams,
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    /// Chunks loaded in each direction around chunk (0, 0).
    pub chunk_radius: i32,
    /// Y of the surface layer.
    pub ground_height: i32,
    pub ground_block: BlockKind,
    /// Extra blocks placed after the flat terrain is generated.
    pub blocks: Vec<BlockPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BlockPlacement {
    pub position: [i32; 3],
    pub block: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: [f64; 3],
    /// Degrees.
    pub yaw: f64,
    /// Degrees.
    pub pitch: f64,
    pub god_mode: bool,
    pub half_extents: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub ticks: u64,
    pub lookup_policy: LookupPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_radius: 2,
            ground_height: 4,
            ground_block: BlockKind::Grass,
            blocks: Vec::new(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 8.0, 0.0],
            yaw: 0.0,
            pitch: 0.0,
            god_mode: false,
            half_extents: PlayerBody::HALF_EXTENTS.to_array(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            lookup_policy: LookupPolicy::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Scenario config not found at {}. Using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        let config = Self::from_toml(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(path = %path.display(), "Loaded scenario config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(contents)?;
        config.movement.validate()?;
        config.player.body()?;
        Ok(config)
    }
}

impl WorldConfig {
    /// Generate the flat world and apply the extra placements.
    pub fn build(&self) -> Result<VoxelGrid> {
        let mut grid = VoxelGrid::flat(
            self.seed,
            self.chunk_radius,
            self.ground_height,
            self.ground_block,
        );
        for placement in &self.blocks {
            let [x, y, z] = placement.position;
            grid.set_block(BlockCell::new(x, y, z), placement.block)
                .with_context(|| format!("invalid placement of {}", placement.block.name()))?;
        }
        Ok(grid)
    }
}

impl PlayerConfig {
    pub fn spawn(&self) -> DVec3 {
        DVec3::from_array(self.spawn)
    }

    pub fn body(&self) -> Result<PlayerBody, InvalidHalfExtents> {
        PlayerBody::with_half_extents(DVec3::from_array(self.half_extents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockmotion_physics::WorldGrid;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("blockmotion_{name}_{timestamp}.toml"))
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = ScenarioConfig::load_from_path(&temp_path("missing")).unwrap();
        assert_eq!(config, ScenarioConfig::default());
        assert_eq!(config.movement.walking_speed, 0.025);
        assert_eq!(config.run.lookup_policy, LookupPolicy::Abort);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = ScenarioConfig::from_toml(
            r#"
            [movement]
            friction = 0.3

            [world]
            seed = 42
            ground_block = "stone"
            blocks = [
                { position = [3, 5, 0], block = "oak_stairs" },
                { position = [0, 5, 3], block = "water" },
            ]

            [player]
            spawn = [1.5, 9.0, -2.0]
            god_mode = true

            [run]
            ticks = 20
            lookup_policy = "treat_as_air"
            "#,
        )
        .unwrap();

        assert_eq!(config.movement.friction, 0.3);
        assert_eq!(config.movement.jump_intensity, 0.16);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.chunk_radius, 2);
        assert_eq!(config.world.blocks.len(), 2);
        assert_eq!(config.world.blocks[0].block, BlockKind::OakStairs);
        assert_eq!(config.player.spawn(), DVec3::new(1.5, 9.0, -2.0));
        assert!(config.player.god_mode);
        assert_eq!(config.player.half_extents, [0.3, 0.8, 0.3]);
        assert_eq!(config.run.ticks, 20);
        assert_eq!(config.run.lookup_policy, LookupPolicy::TreatAsAir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::write(&path, "[movement\nfriction = ").unwrap();
        assert!(ScenarioConfig::load_from_path(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_movement_params_are_rejected() {
        let err = ScenarioConfig::from_toml("[movement]\nfriction = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("friction"), "{err}");
    }

    #[test]
    fn unusable_player_shapes_are_rejected() {
        let err = ScenarioConfig::from_toml("[player]\nhalf_extents = [-0.3, 0.8, 0.3]\n")
            .unwrap_err();
        assert!(err.to_string().contains("negative"), "{err}");

        let err = ScenarioConfig::from_toml("[player]\nhalf_extents = [0.3, inf, 0.3]\n")
            .unwrap_err();
        assert!(err.to_string().contains("finite"), "{err}");

        let config = ScenarioConfig::from_toml("[player]\nhalf_extents = [0.4, 0.9, 0.4]\n").unwrap();
        assert!(config.player.body().is_ok());
    }

    #[test]
    fn world_build_applies_placements() {
        let config = ScenarioConfig::from_toml(
            r#"
            [world]
            chunk_radius = 0
            ground_height = 2
            blocks = [{ position = [1, 3, 1], block = "stone_slab" }]
            "#,
        )
        .unwrap();
        let grid = config.world.build().unwrap();
        assert_eq!(grid.chunk_count(), 1);
        assert_eq!(grid.block_at(BlockCell::new(1, 3, 1)), Ok(BlockKind::StoneSlab));
        assert_eq!(grid.max_terrain_height_at(1, 1), Ok(3.0));
    }

    #[test]
    fn placements_outside_build_height_fail() {
        let config = WorldConfig {
            blocks: vec![BlockPlacement {
                position: [0, 400, 0],
                block: BlockKind::Stone,
            }],
            ..Default::default()
        };
        assert!(config.build().is_err());
    }
}
