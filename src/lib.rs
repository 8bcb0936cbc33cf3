//! A tile-based delivery chase game, without a window.
//!
//! This crate provides:
//! - Tile maps loaded from CSV with walkability and zone tiles
//! - Axis-separated pixel movement against the grid
//! - A* and Dijkstra pathfinding with steering
//! - Enemies that patrol, chase, return or wander and free themselves when stuck
//! - Inventory, restaurants, deliveries and timed orders
//! - A fixed-tick game session driven by logical input actions

pub mod ai;
pub mod core;
pub mod gameplay;
pub mod input;
pub mod physics;
pub mod world;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{Enemy, EnemyConfig, PursuitState, SearchStrategy, find_path};
    pub use crate::core::{GameConfig, GameEvent, GameSession, Outcome};
    pub use crate::gameplay::{Inventory, ItemKind, Player};
    pub use crate::input::{ActionState, InputAction, InputMapper};
    pub use crate::physics::{Body, CollisionResolver, Facing};
    pub use crate::world::{Grid, PixelRect, TileCoord, TileMap, TilePalette};
    pub use glam::{IVec2, Vec2};
}
