//! Vertical snapping, horizontal sliding and swim detection against the block grid.
//!
//! Every test scans the full 27-cell neighbourhood in nearest-first order and
//! never stops at the first contact. When several colliders overlap, the one
//! processed last decides the resolved position. This is an approximation:
//! simultaneous contacts are not merged into a single solve.

use crate::grid::{colliders_for, BlockClass};
use crate::{
    neighbor_cells, Aabb, Axes, Body, KinematicState, LookupPolicy, WorldGrid,
    WorldLookupFailure, EYE_MARGIN, SUBMERSION_BIAS,
};
use glam::DVec3;
use tracing::trace;

/// Share of the block/entity gap applied as push-back during a horizontal slide.
pub const PUSH_BACK_FACTOR: f64 = 0.2;

/// Distance from `v` to the next representable value of larger magnitude.
pub fn ulp(v: f64) -> f64 {
    let magnitude = v.abs();
    if !magnitude.is_finite() {
        return magnitude;
    }
    if magnitude == f64::MAX {
        return 2f64.powi(971);
    }
    f64::from_bits(magnitude.to_bits() + 1) - magnitude
}

/// Result of a liquid scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwimStatus {
    /// The body overlaps at least one liquid collider.
    pub swimming: bool,
    /// The eye point lies inside a liquid collider.
    pub head_under_water: bool,
}

/// Collision queries for one tick against a read-only world.
pub struct CollisionResolver<'w, W: ?Sized> {
    world: &'w W,
    policy: LookupPolicy,
}

impl<'w, W: WorldGrid + ?Sized> CollisionResolver<'w, W> {
    /// Resolver reading `world`, handling lookup failures per `policy`.
    pub fn new(world: &'w W, policy: LookupPolicy) -> Self {
        Self { world, policy }
    }

    /// Snap `state.position.y` out of any solid collider around `origin`.
    ///
    /// If the entity did not move down (`origin.y - y >= 0`) it lands on top of
    /// the block, otherwise it is pushed below it; either way the result is
    /// nudged one ulp away from the face. Returns whether anything was hit.
    pub fn vertical_hit_test<B: Body + ?Sized>(
        &self,
        body: &B,
        state: &mut KinematicState,
        origin: DVec3,
    ) -> Result<bool, WorldLookupFailure> {
        let mut moved = false;

        for cell in neighbor_cells(origin) {
            let colliders = colliders_for(self.world, self.policy, cell, BlockClass::Solid)?;
            let entity = body.aabb_for_position(state.position);

            for block in colliders {
                if !entity.overlaps(&block) {
                    continue;
                }

                let direction = origin.y - state.position.y;
                let half_height = entity.half_extents().y;
                let y = if direction >= 0.0 {
                    let top = block.center().y + block.half_extents().y + half_height;
                    top + ulp(top)
                } else {
                    let bottom = block.center().y - block.half_extents().y - half_height;
                    bottom - ulp(bottom)
                };
                state.position.y = y;
                moved = true;
                trace!(%cell, y, "Vertical contact resolved");
            }
        }

        Ok(moved)
    }

    /// Slide `state.position` along solid colliders it overlaps after moving from `origin`.
    ///
    /// For each overlapping collider the position is rebuilt from `origin`: a
    /// small push towards the contact plus the planar motion projected onto the
    /// contact face. Y stays at `origin.y`. Returns whether anything was hit.
    pub fn horizontal_hit_test<B: Body + ?Sized>(
        &self,
        body: &B,
        state: &mut KinematicState,
        origin: DVec3,
    ) -> Result<bool, WorldLookupFailure> {
        let mut collided = false;

        for cell in neighbor_cells(origin) {
            let colliders = colliders_for(self.world, self.policy, cell, BlockClass::Solid)?;

            for block in colliders {
                let entity = body.aabb_for_position(state.position);
                if !entity.overlaps(&block) {
                    continue;
                }
                collided = true;

                let direction = DVec3::new(
                    state.position.x - origin.x,
                    0.0,
                    state.position.z - origin.z,
                );
                let block_poi = block.closest_point_to(origin);
                let entity_poi = body.aabb_for_position(origin).closest_point_to(block_poi);
                let normal =
                    block.first_hit_plane(direction, origin, entity.half_extents(), Axes::XZ);

                let slide = DVec3::new(normal.z, 0.0, -normal.x);
                let push_back = block_poi - entity_poi;
                let length = slide.dot(direction);

                let mut resolved = origin + push_back * PUSH_BACK_FACTOR + slide * length;
                resolved.y = origin.y;
                state.position = resolved;
                trace!(%cell, ?normal, ?resolved, "Horizontal contact resolved");
            }
        }

        Ok(collided)
    }

    /// Liquid contact of a body at `position`.
    ///
    /// The eye point sits [`EYE_MARGIN`] below the top of the box, raised by
    /// [`SUBMERSION_BIAS`]. Once the head is found submerged no further
    /// containment checks run, but the swimming scan covers every cell.
    pub fn swim_status<B: Body + ?Sized>(
        &self,
        body: &B,
        position: DVec3,
    ) -> Result<SwimStatus, WorldLookupFailure> {
        let entity = body.aabb_for_position(position);
        let eye = position
            + DVec3::new(
                0.0,
                entity.half_extents().y - EYE_MARGIN + SUBMERSION_BIAS,
                0.0,
            );
        let mut status = SwimStatus::default();

        for cell in neighbor_cells(position) {
            for liquid in colliders_for(self.world, self.policy, cell, BlockClass::Liquid)? {
                if !entity.overlaps(&liquid) {
                    continue;
                }
                status.swimming = true;
                if !status.head_under_water && liquid.contains(eye) {
                    status.head_under_water = true;
                }
            }
        }

        Ok(status)
    }

    /// Solid colliders in the neighbourhood of `origin`, nearest cell first.
    pub fn nearby_colliders(&self, origin: DVec3) -> Result<Vec<Aabb>, WorldLookupFailure> {
        let mut colliders = Vec::new();
        for cell in neighbor_cells(origin) {
            colliders.extend(colliders_for(
                self.world,
                self.policy,
                cell,
                BlockClass::Solid,
            )?);
        }
        Ok(colliders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubBlock, StubGrid};
    use crate::{BlockCell, PlayerBody};

    fn wall_grid() -> StubGrid {
        let mut grid = StubGrid::default();
        grid.fill(
            BlockCell::new(2, 1, -1),
            BlockCell::new(2, 1, 1),
            StubBlock::Solid,
        );
        grid
    }

    #[test]
    fn ulp_matches_next_representable() {
        assert_eq!(ulp(1.0), f64::EPSILON);
        assert_eq!(ulp(-1.0), f64::EPSILON);
        assert_eq!(ulp(0.0), f64::from_bits(1));
        assert!(ulp(1.3) > 0.0 && 1.3 + ulp(1.3) > 1.3);
    }

    #[test]
    fn falling_entity_lands_on_block_top() {
        let mut grid = StubGrid::default();
        grid.set(BlockCell::new(0, 0, 0), StubBlock::Solid);
        let body = PlayerBody::new();
        let origin = DVec3::new(0.0, 1.31, 0.0);
        let mut state = KinematicState::new(DVec3::new(0.0, 1.2, 0.0), 0.0, 0.0);

        let resolver = CollisionResolver::new(&grid, LookupPolicy::Abort);
        assert!(resolver
            .vertical_hit_test(&body, &mut state, origin)
            .unwrap());
        let y = state.position().y;
        assert!(y > 1.3);
        assert_eq!(y, 1.3 + ulp(1.3));
        assert!(!body
            .aabb_for_position(state.position())
            .overlaps(&Aabb::new(DVec3::ZERO, DVec3::splat(0.5))));
    }

    #[test]
    fn rising_entity_is_pushed_below_ceiling() {
        let mut grid = StubGrid::default();
        grid.set(BlockCell::new(0, 2, 0), StubBlock::Solid);
        let body = PlayerBody::new();
        let origin = DVec3::new(0.0, 0.65, 0.0);
        let mut state = KinematicState::new(DVec3::new(0.0, 0.75, 0.0), 0.0, 0.0);

        let resolver = CollisionResolver::new(&grid, LookupPolicy::Abort);
        assert!(resolver
            .vertical_hit_test(&body, &mut state, origin)
            .unwrap());
        assert!(state.position().y < 0.7);
    }

    #[test]
    fn no_contact_leaves_position() {
        let grid = StubGrid::default();
        let body = PlayerBody::new();
        let mut state = KinematicState::new(DVec3::new(0.0, 5.0, 0.0), 0.0, 0.0);
        let resolver = CollisionResolver::new(&grid, LookupPolicy::Abort);
        assert!(!resolver
            .vertical_hit_test(&body, &mut state, DVec3::new(0.0, 5.1, 0.0))
            .unwrap());
        assert!(!resolver
            .horizontal_hit_test(&body, &mut state, DVec3::new(0.0, 5.0, 0.1))
            .unwrap());
        assert_eq!(state.position(), DVec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn horizontal_contact_leaves_no_overlap() {
        let grid = wall_grid();
        let body = PlayerBody::new();
        let origin = DVec3::new(1.1, 1.0, 0.0);
        let mut state = KinematicState::new(DVec3::new(1.3, 1.0, 0.0), 0.0, 0.0);

        let resolver = CollisionResolver::new(&grid, LookupPolicy::Abort);
        assert!(resolver
            .horizontal_hit_test(&body, &mut state, origin)
            .unwrap());

        let resolved = body.aabb_for_position(state.position());
        for wall in resolver.nearby_colliders(origin).unwrap() {
            assert!(!resolved.overlaps(&wall), "{resolved:?} overlaps {wall:?}");
        }
        assert!((state.position().x - 1.12).abs() < 1e-12);
        assert_eq!(state.position().y, 1.0);
    }

    #[test]
    fn diagonal_motion_slides_along_wall() {
        let grid = wall_grid();
        let body = PlayerBody::new();
        let origin = DVec3::new(1.1, 1.0, 0.0);
        let mut state = KinematicState::new(DVec3::new(1.3, 1.0, 0.1), 0.0, 0.0);

        let resolver = CollisionResolver::new(&grid, LookupPolicy::Abort);
        assert!(resolver
            .horizontal_hit_test(&body, &mut state, origin)
            .unwrap());
        assert!((state.position().z - 0.1).abs() < 1e-12);
        assert!(state.position().x < 1.2);
    }

    #[test]
    fn swim_status_tracks_body_and_eye() {
        let body = PlayerBody::new();
        let position = DVec3::new(0.0, 1.0, 0.0);

        let mut deep = StubGrid::default();
        deep.fill(
            BlockCell::new(-1, 0, -1),
            BlockCell::new(1, 2, 1),
            StubBlock::Liquid,
        );
        let status = CollisionResolver::new(&deep, LookupPolicy::Abort)
            .swim_status(&body, position)
            .unwrap();
        assert_eq!(
            status,
            SwimStatus {
                swimming: true,
                head_under_water: true
            }
        );

        let mut shallow = StubGrid::default();
        shallow.fill(
            BlockCell::new(-1, 0, -1),
            BlockCell::new(1, 1, 1),
            StubBlock::Liquid,
        );
        let status = CollisionResolver::new(&shallow, LookupPolicy::Abort)
            .swim_status(&body, position)
            .unwrap();
        assert!(status.swimming);
        assert!(!status.head_under_water);
    }

    #[test]
    fn lookup_failure_aborts_scan() {
        let mut grid = wall_grid();
        grid.fail_at(BlockCell::new(1, 1, 0));
        let body = PlayerBody::new();
        let mut state = KinematicState::new(DVec3::new(1.3, 1.0, 0.0), 0.0, 0.0);

        let strict = CollisionResolver::new(&grid, LookupPolicy::Abort);
        let err = strict
            .horizontal_hit_test(&body, &mut state, DVec3::new(1.1, 1.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            WorldLookupFailure::Unloaded {
                cell: BlockCell::new(1, 1, 0)
            }
        );

        let lenient = CollisionResolver::new(&grid, LookupPolicy::TreatAsAir);
        assert!(lenient
            .horizontal_hit_test(&body, &mut state, DVec3::new(1.1, 1.0, 0.0))
            .unwrap());
    }
}
