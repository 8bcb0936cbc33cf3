//! Movement and collision module
//!
//! Axis-separated movement of pixel bodies against the tile grid

mod body;
mod collision;

pub use body::{Body, Facing};
pub use collision::{Axis, CollisionResolver};
