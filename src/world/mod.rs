//! Tile world module
//!
//! Static map data: the walkability grid, pixel rects, map loading and
//! spawn placement.

mod grid;
mod loader;
mod rect;
mod spawn;

pub use grid::{CoveredTiles, Grid, TileCoord};
pub use loader::{MapError, TileMap, TilePalette, ZoneKind};
pub use rect::PixelRect;
pub use spawn::{DEFAULT_SPAWN_ATTEMPTS, spawn_on_path};
