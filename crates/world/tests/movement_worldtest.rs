//! Movement Worldtest
//!
//! Focus areas:
//! - Sliding along a wall instead of stopping dead
//! - Liquid detection for body and head
//! - Free flight through solid terrain in god mode
//! - Lifting entities that fell out of the world back onto the terrain

use blockmotion_audio::SoundLog;
use blockmotion_physics::{
    BlockCell, DVec3, MovableEntity, MovementParams, PlayerBody, PlayerCommands,
};
use blockmotion_testkit::{run_micro_worldtest, MicroWorldtestConfig};
use blockmotion_world::{BlockKind, VoxelGrid};
use serde::Serialize;

const WORLD_SEED: u64 = 9001;
const GROUND_HEIGHT: i32 = 4;

struct Scenario {
    grid: VoxelGrid,
    player: MovableEntity<PlayerBody, SoundLog>,
}

#[derive(Debug, Clone, Serialize)]
struct Frame {
    position: [f64; 3],
    max_x: f64,
}

fn player_at(position: DVec3) -> MovableEntity<PlayerBody, SoundLog> {
    MovableEntity::new(
        PlayerBody::new(),
        MovementParams::default(),
        SoundLog::default(),
        position,
    )
    .expect("default params are valid")
}

fn walking(yaw_deg: f64) -> PlayerCommands {
    PlayerCommands {
        forward: true,
        yaw: yaw_deg,
        ..Default::default()
    }
}

#[test]
fn player_slides_along_wall() {
    let mut grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    grid.fill(
        BlockCell::new(3, 5, -12),
        BlockCell::new(3, 6, 8),
        BlockKind::Stone,
    )
    .unwrap();

    let mut player = player_at(DVec3::new(1.5, 5.4, 0.0));
    player.body_mut().set_commands(walking(45.0));

    let mut collisions = 0;
    let report = run_micro_worldtest(
        MicroWorldtestConfig::new("wall_slide", 150),
        Scenario { grid, player },
        |_, s| {
            let tick = s.player.update(&s.grid)?;
            if tick.horizontal_collision {
                collisions += 1;
            }
            Ok(())
        },
        |_, s| Frame {
            position: s.player.position().to_array(),
            max_x: s.player.aabb().max().x,
        },
    )
    .expect("run completes");

    for frame in report.snapshots() {
        // The wall's west face is at x = 2.5.
        assert!(frame.max_x <= 2.5, "entered wall: {}", frame.max_x);
    }
    let last = report.last().unwrap();
    assert!(last.max_x > 2.4, "never reached wall: {}", last.max_x);
    assert!(last.position[2] < -2.0, "stopped instead of sliding: {:?}", last.position);
    assert!(collisions > 0);
}

#[test]
fn walking_without_obstacles_keeps_heading() {
    let grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    let mut player = player_at(DVec3::new(0.0, 5.4, 0.0));
    player.body_mut().set_commands(walking(90.0));

    let mut horizontal = 0;
    for _ in 0..100 {
        if player.update(&grid).unwrap().horizontal_collision {
            horizontal += 1;
        }
    }
    assert_eq!(horizontal, 0);
    assert!(player.position().x > 1.0);
    assert!(player.position().z.abs() < 1e-9);
    assert!(player.state().step_counter() > 1.0);
}

#[test]
fn swim_status_tracks_body_and_head() {
    let mut grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    grid.fill(
        BlockCell::new(-2, 2, -2),
        BlockCell::new(2, 4, 2),
        BlockKind::Water,
    )
    .unwrap();

    let mut player = player_at(DVec3::new(0.0, 3.0, 0.0));
    player.set_god_mode(true);

    player.update(&grid).unwrap();
    assert!(player.state().is_swimming());
    assert!(player.state().is_head_under_water());

    player.teleport(DVec3::new(0.0, 4.5, 0.0));
    player.update(&grid).unwrap();
    assert!(player.state().is_swimming());
    assert!(!player.state().is_head_under_water());

    player.teleport(DVec3::new(0.0, 7.0, 0.0));
    player.update(&grid).unwrap();
    assert!(!player.state().is_swimming());
    assert!(!player.state().is_head_under_water());
}

#[test]
fn water_slows_sinking() {
    let mut grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    grid.fill(
        BlockCell::new(-3, 2, -3),
        BlockCell::new(3, 4, 3),
        BlockKind::Water,
    )
    .unwrap();

    let start = 3.5;
    let mut player = player_at(DVec3::new(0.0, start, 0.0));
    for _ in 0..20 {
        player.update(&grid).unwrap();
    }
    assert!(player.state().is_swimming());
    assert!(!player.state().touching_ground());
    // Twenty ticks of dry falling would cover more than a block.
    assert!(start - player.position().y < 0.3, "sank to {}", player.position().y);
}

#[test]
fn god_mode_flies_through_terrain() {
    let mut grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    grid.fill(
        BlockCell::new(2, 3, -1),
        BlockCell::new(3, 8, 1),
        BlockKind::Stone,
    )
    .unwrap();

    let mut player = player_at(DVec3::new(0.0, 4.0, 0.0));
    player.set_god_mode(true);
    player.body_mut().set_commands(walking(90.0));

    for _ in 0..150 {
        let report = player.update(&grid).unwrap();
        assert!(!report.vertical_collision);
        assert!(!report.horizontal_collision);
        assert!(report.sounds_played.is_empty());
    }
    assert!(player.position().x > 4.0, "x = {}", player.position().x);
    assert_eq!(player.position().y, 4.0);
    assert_eq!(player.state().gravity(), 0.0);
}

#[test]
fn fallen_player_is_lifted_onto_terrain() {
    let mut grid = VoxelGrid::flat(WORLD_SEED, 1, GROUND_HEIGHT, BlockKind::Grass);
    grid.set_block(BlockCell::new(3, 7, 5), BlockKind::StoneSlab)
        .unwrap();

    let mut player = player_at(DVec3::new(3.7, -3.0, 5.2));
    let report = player.update(&grid).unwrap();
    assert!(report.clamped_to_terrain);
    // Column (3, 5): the slab on top of the pillar of air wins over the grass.
    assert_eq!(player.position().y, 7.0);

    let mut elsewhere = player_at(DVec3::new(-6.9, -40.0, 2.5));
    elsewhere.update(&grid).unwrap();
    assert_eq!(elsewhere.position().y, 4.5);
}
