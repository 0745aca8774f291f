//! In-memory grid for unit tests.

use crate::{Aabb, BlockType, WorldGrid, WorldLookupFailure};
use blockmotion_core::BlockCell;
use glam::DVec3;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBlock {
    Air,
    Solid,
    Liquid,
}

impl BlockType for StubBlock {
    fn is_penetrable(&self) -> bool {
        !matches!(self, StubBlock::Solid)
    }

    fn is_liquid(&self) -> bool {
        matches!(self, StubBlock::Liquid)
    }

    fn colliders(&self, cell: BlockCell) -> Vec<Aabb> {
        match self {
            StubBlock::Air => Vec::new(),
            StubBlock::Solid | StubBlock::Liquid => vec![Aabb::new(
                DVec3::new(cell.x as f64, cell.y as f64, cell.z as f64),
                DVec3::splat(0.5),
            )],
        }
    }
}

#[derive(Debug, Default)]
pub struct StubGrid {
    blocks: HashMap<BlockCell, StubBlock>,
    failing: HashSet<BlockCell>,
    lookups: Cell<usize>,
    draws: Cell<i32>,
    pub terrain_height: f64,
}

impl StubGrid {
    pub fn set(&mut self, cell: BlockCell, block: StubBlock) {
        self.blocks.insert(cell, block);
    }

    /// Fill the inclusive box `min..=max`.
    pub fn fill(&mut self, min: BlockCell, max: BlockCell, block: StubBlock) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set(BlockCell::new(x, y, z), block);
                }
            }
        }
    }

    pub fn fail_at(&mut self, cell: BlockCell) {
        self.failing.insert(cell);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    /// Number of `random_int` calls so far.
    pub fn draws(&self) -> i32 {
        self.draws.get()
    }
}

impl WorldGrid for StubGrid {
    type Block = StubBlock;

    fn block_at(&self, cell: BlockCell) -> Result<StubBlock, WorldLookupFailure> {
        self.lookups.set(self.lookups.get() + 1);
        if self.failing.contains(&cell) {
            return Err(WorldLookupFailure::Unloaded { cell });
        }
        Ok(self.blocks.get(&cell).copied().unwrap_or(StubBlock::Air))
    }

    fn max_terrain_height_at(&self, _x: i32, _z: i32) -> Result<f64, WorldLookupFailure> {
        Ok(self.terrain_height)
    }

    fn random_int(&self) -> i32 {
        let next = self.draws.get().wrapping_add(1);
        self.draws.set(next);
        next
    }
}
