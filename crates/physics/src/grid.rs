//! What the kinematics core needs from the world.

use crate::Aabb;
use blockmotion_core::BlockCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Classification of a block as seen by collision and swim detection.
pub trait BlockType {
    /// Whether entities pass through this block (air, foliage, liquids).
    fn is_penetrable(&self) -> bool;

    /// Whether this block counts as liquid for swim detection.
    fn is_liquid(&self) -> bool;

    /// Collision boxes of this block when placed at `cell`. A block may contribute
    /// several boxes (stairs) or none.
    fn colliders(&self, cell: BlockCell) -> Vec<Aabb>;
}

/// Read-only view of the block grid.
pub trait WorldGrid {
    /// Block classification returned by lookups.
    type Block: BlockType;

    /// Block occupying `cell`.
    fn block_at(&self, cell: BlockCell) -> Result<Self::Block, WorldLookupFailure>;

    /// Height of the highest solid surface in the (x, z) column.
    fn max_terrain_height_at(&self, x: i32, z: i32) -> Result<f64, WorldLookupFailure>;

    /// Entropy source for sound variation.
    fn random_int(&self) -> i32;
}

/// A block or column the world could not answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldLookupFailure {
    /// The chunk holding the cell is not loaded.
    #[error("block {cell} is in an unloaded chunk")]
    Unloaded {
        /// Requested cell.
        cell: BlockCell,
    },
    /// The stored block id is not in the block catalogue.
    #[error("block {cell} holds unknown block id {id}")]
    InvalidBlockId {
        /// Requested cell.
        cell: BlockCell,
        /// Raw id found in storage.
        id: u16,
    },
    /// The terrain column is not loaded.
    #[error("terrain column ({x}, {z}) is not loaded")]
    ColumnUnloaded {
        /// Column X.
        x: i32,
        /// Column Z.
        z: i32,
    },
}

/// What a tick does when the world cannot answer a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Abandon the tick and return the failure; entity state is left untouched.
    #[default]
    Abort,
    /// Log a warning and treat the cell as air (and skip the terrain clamp).
    TreatAsAir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockClass {
    Solid,
    Liquid,
}

/// Colliders of the block at `cell` if it belongs to `class`, otherwise none.
pub(crate) fn colliders_for<W: WorldGrid + ?Sized>(
    world: &W,
    policy: LookupPolicy,
    cell: BlockCell,
    class: BlockClass,
) -> Result<Vec<Aabb>, WorldLookupFailure> {
    let block = match world.block_at(cell) {
        Ok(block) => block,
        Err(err) => match policy {
            LookupPolicy::Abort => return Err(err),
            LookupPolicy::TreatAsAir => {
                warn!(%err, "Block lookup failed; treating cell as air");
                return Ok(Vec::new());
            }
        },
    };

    let wanted = match class {
        BlockClass::Solid => !block.is_penetrable(),
        BlockClass::Liquid => block.is_liquid(),
    };
    if wanted {
        Ok(block.colliders(cell))
    } else {
        Ok(Vec::new())
    }
}
