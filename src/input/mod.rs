//! Input handling module
//!
//! Logical actions, key bindings and per-tick action state.

mod command;
mod state;

pub use command::{InputAction, InputMapper};
pub use state::ActionState;
