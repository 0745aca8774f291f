//! Integer block-grid coordinates.
//!
//! Blocks are unit cubes centred on integer coordinates, so a continuous
//! position belongs to the cell it is *nearest* to, not the one below it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer (x, y, z) coordinate of a block cell.
///
/// Ordering is the natural tuple order (x, then y, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct BlockCell {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockCell {
    /// Create a cell from raw coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell whose centre is nearest to the continuous point (round half away from zero).
    pub fn containing(x: f64, y: f64, z: f64) -> Self {
        Self::new(
            nearest_cell_coord(x),
            nearest_cell_coord(y),
            nearest_cell_coord(z),
        )
    }

    /// Shift the cell by an integer offset.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Centre of the cell in world space.
    pub fn center(self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    /// Squared euclidean distance from the cell centre to a continuous point.
    pub fn distance_squared_to(self, x: f64, y: f64, z: f64) -> f64 {
        let dx = self.x as f64 - x;
        let dy = self.y as f64 - y;
        let dz = self.z as f64 - z;
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for BlockCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Round a world coordinate to its nearest cell coordinate.
///
/// `floor(v + 0.5)` for non-negative values and `ceil(v - 0.5)` for negative
/// ones, so `-0.4` maps to `0` and `-0.6` maps to `-1`.
pub fn nearest_cell_coord(v: f64) -> i32 {
    if v >= 0.0 {
        (v + 0.5).floor() as i32
    } else {
        (v - 0.5).ceil() as i32
    }
}
