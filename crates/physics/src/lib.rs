#![warn(missing_docs)]
//! Per-tick kinematics and block collision for entities moving through a voxel grid.
//!
//! The pieces, leaves first:
//!
//! - [`Aabb`] - centre + half-extent boxes with the overlap, closest-point and
//!   first-hit-plane queries the resolver needs.
//! - [`neighbor_cells`] - the 27 cells around a point, nearest first.
//! - [`WorldGrid`] / [`BlockType`] - what the core asks of the world.
//! - [`KinematicState`] - position, velocity, gravity accumulator, orientation, flags.
//! - [`MovementIntent`] - turns walk/strafe/jump commands into a movement vector.
//! - [`CollisionResolver`] - vertical snapping, horizontal sliding, swim detection.
//! - [`MovableEntity`] - the integrator tying it together, one `update()` per tick.

mod aabb;
mod block_index;
mod body;
mod collision;
mod entity;
mod footsteps;
mod grid;
mod intent;
mod integrator;
mod params;
mod state;

pub use aabb::{checked_half_extents, Aabb, Axes, InvalidHalfExtents};
pub use block_index::{neighbor_cells, NEIGHBORHOOD_SIZE};
pub use body::{Body, NpcBody, PlayerBody, PlayerCommands, WanderState};
pub use collision::{ulp, CollisionResolver, SwimStatus, PUSH_BACK_FACTOR};
pub use entity::{MovableEntity, TickReport};
pub use footsteps::{FootstepClock, FOOTSTEP_SPEED_THRESHOLD};
pub use grid::{BlockType, LookupPolicy, WorldGrid, WorldLookupFailure};
pub use intent::MovementIntent;
pub use integrator::{accumulate_gravity, apply_friction, clamp_to_speed};
pub use params::{InvalidMovementParams, MovementParams};
pub use state::{KinematicState, EYE_MARGIN, MAX_PITCH, SUBMERSION_BIAS};

pub use blockmotion_core::BlockCell;
pub use glam::DVec3;

#[cfg(test)]
pub(crate) mod test_support;
