//! AI and navigation module
//!
//! Provides grid pathfinding, steering behaviors and the enemy pursuit
//! state machine.

mod pathfinding;
mod pursuit;
mod steering;

pub use pathfinding::{Path, SearchStrategy, find_path};
pub use pursuit::{
    ChaseFallback, Enemy, EnemyConfig, EnemySnapshot, EnemyUpdate, PatrolAxis, PursuitContext,
    PursuitState,
};
pub use steering::{Arrive, Seek, SteeringBehavior, SteeringOutput};
