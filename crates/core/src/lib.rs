#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod cell;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

pub use cell::{nearest_cell_coord, BlockCell};

/// Fixed simulation tick. One kinematic update runs per entity per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Ticks elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Helper to derive a reproducible RNG seeded by world + domain + tick.
pub fn scoped_rng(world_seed: u64, domain_hash: u64, tick: SimTick) -> StdRng {
    let seed = world_seed ^ domain_hash ^ tick.0;
    StdRng::seed_from_u64(seed)
}
