use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use blockmotion_core::{scoped_rng, SimTick};
use blockmotion_physics::{BlockCell, BlockType, WorldGrid, WorldLookupFailure};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::{
    BlockId, BlockKind, Chunk, ChunkPos, LocalPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z,
};

/// Domain tag mixed into the seed for sound-variation draws.
const RANDOM_DOMAIN: u64 = 0x5EED_F007_57E9_0001;

/// Rejected grid edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridEditError {
    /// The cell lies above or below the chunk height range.
    #[error("block {cell} is outside the build height 0..{max}", max = CHUNK_SIZE_Y)]
    OutOfHeight {
        /// Requested cell.
        cell: BlockCell,
    },
}

/// In-memory chunked block grid.
/// Uses BTreeMap for deterministic iteration order.
///
/// Cells in chunks that were never loaded fail lookups with
/// [`WorldLookupFailure::Unloaded`]. Inside a loaded column, cells above or
/// below the build height read as air.
pub struct VoxelGrid {
    seed: u64,
    chunks: BTreeMap<ChunkPos, Chunk>,
    draws: AtomicU64,
}

impl VoxelGrid {
    /// Empty grid with no loaded chunks.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chunks: BTreeMap::new(),
            draws: AtomicU64::new(0),
        }
    }

    /// Flat world: stone up to `ground_height`, topped with `surface` at
    /// `ground_height`, in every chunk within `chunk_radius` of the origin.
    pub fn flat(seed: u64, chunk_radius: i32, ground_height: i32, surface: BlockKind) -> Self {
        let mut grid = Self::new(seed);
        let radius = chunk_radius.max(0);
        let top = ground_height.clamp(0, CHUNK_SIZE_Y as i32 - 1);

        for cx in -radius..=radius {
            for cz in -radius..=radius {
                let pos = ChunkPos::new(cx, cz);
                let chunk = grid.ensure_chunk(pos);
                for lx in 0..CHUNK_SIZE_X {
                    for lz in 0..CHUNK_SIZE_Z {
                        for y in 0..=top as usize {
                            let id = if y as i32 == top {
                                surface.id()
                            } else {
                                BlockKind::Stone.id()
                            };
                            chunk.set_id(LocalPos { x: lx, y, z: lz }, id);
                        }
                    }
                }
            }
        }

        debug!(
            seed,
            chunks = grid.chunks.len(),
            ground_height = top,
            surface = surface.name(),
            "Generated flat grid"
        );
        grid
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Obtain mutable access to a chunk, creating it if necessary.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        self.chunks.entry(pos).or_insert_with(|| Chunk::new(pos))
    }

    /// Drop a chunk; later lookups inside it fail.
    pub fn unload_chunk(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    /// Place a block, loading its chunk if needed.
    pub fn set_block(&mut self, cell: BlockCell, kind: BlockKind) -> Result<(), GridEditError> {
        self.set_raw_id(cell, kind.id())
    }

    /// Store a raw id without checking it against the catalogue.
    pub fn set_raw_id(&mut self, cell: BlockCell, id: BlockId) -> Result<(), GridEditError> {
        let (pos, local) = ChunkPos::split(cell).ok_or(GridEditError::OutOfHeight { cell })?;
        self.ensure_chunk(pos).set_id(local, id);
        Ok(())
    }

    /// Fill the inclusive box `min..=max`.
    pub fn fill(
        &mut self,
        min: BlockCell,
        max: BlockCell,
        kind: BlockKind,
    ) -> Result<(), GridEditError> {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set_block(BlockCell::new(x, y, z), kind)?;
                }
            }
        }
        Ok(())
    }

    /// Block at `cell`.
    pub fn block(&self, cell: BlockCell) -> Result<BlockKind, WorldLookupFailure> {
        let pos = ChunkPos::containing(cell.x, cell.z);
        let chunk = self
            .chunks
            .get(&pos)
            .ok_or(WorldLookupFailure::Unloaded { cell })?;
        let Some((_, local)) = ChunkPos::split(cell) else {
            return Ok(BlockKind::Air);
        };
        let id = chunk.id(local);
        BlockKind::from_id(id).ok_or(WorldLookupFailure::InvalidBlockId { cell, id })
    }
}

impl WorldGrid for VoxelGrid {
    type Block = BlockKind;

    fn block_at(&self, cell: BlockCell) -> Result<BlockKind, WorldLookupFailure> {
        self.block(cell)
    }

    /// Top of the highest solid collider in the column, or 0 if it has none.
    fn max_terrain_height_at(&self, x: i32, z: i32) -> Result<f64, WorldLookupFailure> {
        if !self.is_loaded(ChunkPos::containing(x, z)) {
            return Err(WorldLookupFailure::ColumnUnloaded { x, z });
        }
        for y in (0..CHUNK_SIZE_Y as i32).rev() {
            let cell = BlockCell::new(x, y, z);
            let block = self.block(cell)?;
            if block.is_penetrable() {
                continue;
            }
            if let Some(top) = block
                .colliders(cell)
                .iter()
                .map(|aabb| aabb.max().y)
                .reduce(f64::max)
            {
                return Ok(top);
            }
        }
        Ok(0.0)
    }

    fn random_int(&self) -> i32 {
        let draw = self.draws.fetch_add(1, Ordering::Relaxed);
        scoped_rng(self.seed, RANDOM_DOMAIN, SimTick(draw)).gen()
    }
}
