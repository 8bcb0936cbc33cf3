//! Core module
//!
//! Configuration, the simulation clock, events and the game session that
//! ties every other module together.

mod config;
mod events;
mod session;
mod time;

pub use config::{ConfigError, GameConfig};
pub use events::{EventQueue, GameEvent};
pub use session::{GameSession, Outcome};
pub use time::Time;
