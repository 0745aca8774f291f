//! Enumeration of the block cells around a continuous position.

use blockmotion_core::BlockCell;
use glam::DVec3;

/// Number of cells in the 3x3x3 neighbourhood.
pub const NEIGHBORHOOD_SIZE: usize = 27;

/// The 27 cells around `origin`, nearest first.
///
/// The centre cell is the one nearest to `origin` (see
/// [`BlockCell::containing`]); the others are its -1/0/+1 offsets on each axis.
/// Cells are ordered by squared distance from `origin` to the cell centre, ties
/// broken by the cell's natural (x, y, z) order, so the sequence is fully
/// deterministic.
pub fn neighbor_cells(origin: DVec3) -> [BlockCell; NEIGHBORHOOD_SIZE] {
    let center = BlockCell::containing(origin.x, origin.y, origin.z);
    let mut cells = [center; NEIGHBORHOOD_SIZE];

    let mut i = 0;
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                cells[i] = center.offset(dx, dy, dz);
                i += 1;
            }
        }
    }

    cells.sort_by(|a, b| {
        let da = a.distance_squared_to(origin.x, origin.y, origin.z);
        let db = b.distance_squared_to(origin.x, origin.y, origin.z);
        da.total_cmp(&db).then_with(|| a.cmp(b))
    });
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn yields_27_distinct_cells_nearest_first() {
        let origin = DVec3::new(3.2, 10.7, -4.4);
        let cells = neighbor_cells(origin);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), NEIGHBORHOOD_SIZE);
        assert_eq!(cells[0], BlockCell::new(3, 11, -4));
        for pair in cells.windows(2) {
            let a = pair[0].distance_squared_to(origin.x, origin.y, origin.z);
            let b = pair[1].distance_squared_to(origin.x, origin.y, origin.z);
            assert!(a <= b);
        }
    }

    #[test]
    fn centre_cell_uses_nearest_rounding() {
        let cells = neighbor_cells(DVec3::new(-0.4, 0.0, 0.0));
        assert_eq!(cells[0], BlockCell::new(0, 0, 0));
        let cells = neighbor_cells(DVec3::new(-0.6, 0.0, 0.0));
        assert_eq!(cells[0], BlockCell::new(-1, 0, 0));
    }

    #[test]
    fn ties_follow_tuple_order() {
        // At an exact cell centre the six face neighbours are equidistant.
        let cells = neighbor_cells(DVec3::ZERO);
        assert_eq!(cells[0], BlockCell::new(0, 0, 0));
        assert_eq!(
            &cells[1..7],
            &[
                BlockCell::new(-1, 0, 0),
                BlockCell::new(0, -1, 0),
                BlockCell::new(0, 0, -1),
                BlockCell::new(0, 0, 1),
                BlockCell::new(0, 1, 0),
                BlockCell::new(1, 0, 0),
            ]
        );
        assert_eq!(cells[26], BlockCell::new(1, 1, 1));
    }
}
