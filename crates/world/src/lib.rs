//! Chunked in-memory block grid that the kinematics core queries.

mod block;
mod chunk;
mod grid;

pub use block::*;
pub use chunk::*;
pub use grid::*;
