use blockmotion_core::BlockCell;
use std::fmt;

use crate::{BlockId, BLOCK_AIR};

/// Chunk width (X axis) in voxels.
pub const CHUNK_SIZE_X: usize = 16;
/// Chunk height (Y axis) in voxels.
pub const CHUNK_SIZE_Y: usize = 256;
/// Chunk depth (Z axis) in voxels.
pub const CHUNK_SIZE_Z: usize = 16;
/// Total voxel count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Chunk-local position (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    /// Convert to a linear index within the id array.
    pub fn index(self) -> usize {
        debug_assert!(self.x < CHUNK_SIZE_X);
        debug_assert!(self.y < CHUNK_SIZE_Y);
        debug_assert!(self.z < CHUNK_SIZE_Z);
        (self.y * CHUNK_SIZE_Z + self.z) * CHUNK_SIZE_X + self.x
    }
}

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk holding the world column (x, z).
    pub fn containing(x: i32, z: i32) -> Self {
        Self::new(
            x.div_euclid(CHUNK_SIZE_X as i32),
            z.div_euclid(CHUNK_SIZE_Z as i32),
        )
    }

    /// Split a world cell into its chunk and chunk-local position.
    ///
    /// Returns `None` when `cell.y` is outside the chunk's vertical range.
    pub fn split(cell: BlockCell) -> Option<(ChunkPos, LocalPos)> {
        if cell.y < 0 || cell.y >= CHUNK_SIZE_Y as i32 {
            return None;
        }
        let local = LocalPos {
            x: cell.x.rem_euclid(CHUNK_SIZE_X as i32) as usize,
            y: cell.y as usize,
            z: cell.z.rem_euclid(CHUNK_SIZE_Z as i32) as usize,
        };
        Some((Self::containing(cell.x, cell.z), local))
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Column-major block id storage for one 16x256x16 chunk.
#[derive(Clone)]
pub struct Chunk {
    position: ChunkPos,
    ids: Vec<BlockId>,
}

impl Chunk {
    /// Allocate a fresh chunk filled with air.
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            ids: vec![BLOCK_AIR; CHUNK_VOLUME],
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Raw id stored at a local position.
    pub fn id(&self, pos: LocalPos) -> BlockId {
        self.ids[pos.index()]
    }

    /// Store a raw id. Returns whether the stored value changed.
    pub fn set_id(&mut self, pos: LocalPos, id: BlockId) -> bool {
        let slot = &mut self.ids[pos.index()];
        let changed = *slot != id;
        *slot = id;
        changed
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.ids.iter().filter(|&&id| id != BLOCK_AIR).count()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("position", &self.position)
            .field("non_air", &self.solid_count())
            .finish()
    }
}
