//! Block catalogue and collision shapes.

use blockmotion_physics::{Aabb, BlockCell, BlockType, DVec3};
use serde::{Deserialize, Serialize};

/// Block identifier stored in chunks.
pub type BlockId = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;
/// ID for stone.
pub const BLOCK_STONE: BlockId = 1;
/// ID for dirt.
pub const BLOCK_DIRT: BlockId = 2;
/// ID for grass.
pub const BLOCK_GRASS: BlockId = 3;
/// ID for tall grass (foliage, no collision).
pub const BLOCK_TALL_GRASS: BlockId = 4;
/// ID for water.
pub const BLOCK_WATER: BlockId = 5;
/// ID for a bottom stone slab.
pub const BLOCK_STONE_SLAB: BlockId = 6;
/// ID for oak stairs rising towards -Z.
pub const BLOCK_OAK_STAIRS: BlockId = 7;

/// Every block the grid knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Air,
    Stone,
    Dirt,
    Grass,
    TallGrass,
    Water,
    StoneSlab,
    OakStairs,
}

const HALF_BLOCK: DVec3 = DVec3::new(0.5, 0.5, 0.5);

impl BlockKind {
    /// Look up a raw id; unknown ids yield `None`.
    pub fn from_id(id: BlockId) -> Option<Self> {
        Some(match id {
            BLOCK_AIR => BlockKind::Air,
            BLOCK_STONE => BlockKind::Stone,
            BLOCK_DIRT => BlockKind::Dirt,
            BLOCK_GRASS => BlockKind::Grass,
            BLOCK_TALL_GRASS => BlockKind::TallGrass,
            BLOCK_WATER => BlockKind::Water,
            BLOCK_STONE_SLAB => BlockKind::StoneSlab,
            BLOCK_OAK_STAIRS => BlockKind::OakStairs,
            _ => return None,
        })
    }

    pub fn id(self) -> BlockId {
        match self {
            BlockKind::Air => BLOCK_AIR,
            BlockKind::Stone => BLOCK_STONE,
            BlockKind::Dirt => BLOCK_DIRT,
            BlockKind::Grass => BLOCK_GRASS,
            BlockKind::TallGrass => BLOCK_TALL_GRASS,
            BlockKind::Water => BLOCK_WATER,
            BlockKind::StoneSlab => BLOCK_STONE_SLAB,
            BlockKind::OakStairs => BLOCK_OAK_STAIRS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Stone => "stone",
            BlockKind::Dirt => "dirt",
            BlockKind::Grass => "grass",
            BlockKind::TallGrass => "tall_grass",
            BlockKind::Water => "water",
            BlockKind::StoneSlab => "stone_slab",
            BlockKind::OakStairs => "oak_stairs",
        }
    }
}

impl BlockType for BlockKind {
    fn is_penetrable(&self) -> bool {
        matches!(
            self,
            BlockKind::Air | BlockKind::TallGrass | BlockKind::Water
        )
    }

    fn is_liquid(&self) -> bool {
        matches!(self, BlockKind::Water)
    }

    fn colliders(&self, cell: BlockCell) -> Vec<Aabb> {
        let [x, y, z] = cell.center();
        let center = DVec3::new(x, y, z);
        match self {
            BlockKind::Air | BlockKind::TallGrass => Vec::new(),
            BlockKind::Stone | BlockKind::Dirt | BlockKind::Grass | BlockKind::Water => {
                vec![Aabb::new(center, HALF_BLOCK)]
            }
            BlockKind::StoneSlab => vec![lower_half(center)],
            BlockKind::OakStairs => vec![
                lower_half(center),
                Aabb::new(
                    center + DVec3::new(0.0, 0.25, -0.25),
                    DVec3::new(0.5, 0.25, 0.25),
                ),
            ],
        }
    }
}

fn lower_half(center: DVec3) -> Aabb {
    Aabb::new(center - DVec3::new(0.0, 0.25, 0.0), DVec3::new(0.5, 0.25, 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BlockKind; 8] = [
        BlockKind::Air,
        BlockKind::Stone,
        BlockKind::Dirt,
        BlockKind::Grass,
        BlockKind::TallGrass,
        BlockKind::Water,
        BlockKind::StoneSlab,
        BlockKind::OakStairs,
    ];

    #[test]
    fn ids_are_stable() {
        for kind in ALL {
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind), "{}", kind.name());
        }
        assert_eq!(BlockKind::from_id(999), None);
    }

    #[test]
    fn penetrable_blocks_have_no_solid_shape() {
        assert!(BlockKind::TallGrass.is_penetrable());
        assert!(BlockKind::TallGrass.colliders(BlockCell::new(0, 0, 0)).is_empty());
        assert!(!BlockKind::Stone.is_penetrable());
        assert!(BlockKind::Water.is_penetrable() && BlockKind::Water.is_liquid());
    }

    #[test]
    fn slab_occupies_lower_half() {
        let colliders = BlockKind::StoneSlab.colliders(BlockCell::new(2, 3, 4));
        assert_eq!(colliders.len(), 1);
        assert_eq!(colliders[0].min(), DVec3::new(1.5, 2.5, 3.5));
        assert_eq!(colliders[0].max(), DVec3::new(2.5, 3.0, 4.5));
    }

    #[test]
    fn stairs_have_two_boxes() {
        let colliders = BlockKind::OakStairs.colliders(BlockCell::new(0, 0, 0));
        assert_eq!(colliders.len(), 2);
        assert_eq!(colliders[1].max().y, 0.5);
        assert_eq!(colliders[1].min().z, -0.5);
        assert_eq!(colliders[1].max().z, 0.0);
    }

    #[test]
    fn kinds_parse_from_snake_case() {
        let kind: BlockKind = serde_json::from_str("\"oak_stairs\"").unwrap();
        assert_eq!(kind, BlockKind::OakStairs);
    }
}
