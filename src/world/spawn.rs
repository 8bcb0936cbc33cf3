//! Random placement of entities on walkable ground

use glam::{IVec2, Vec2};
use rand::Rng;

use super::{Grid, MapError, PixelRect};

/// Attempts made by [`spawn_on_path`] when the caller has no preference
pub const DEFAULT_SPAWN_ATTEMPTS: usize = 2000;

/// Pick a random top-left pixel position where a rect of `size` covers
/// only walkable tiles.
///
/// # Errors
///
/// Returns [`MapError::NoSpawnPosition`] when no valid position was hit in
/// `max_attempts` tries, or when the map is empty.
pub fn spawn_on_path<R: Rng + ?Sized>(
    grid: &Grid,
    size: IVec2,
    rng: &mut R,
    max_attempts: usize,
) -> Result<Vec2, MapError> {
    let no_position = MapError::NoSpawnPosition {
        width: size.x,
        height: size.y,
    };
    if grid.walkable_count() == 0 {
        return Err(no_position);
    }

    let bounds = grid.pixel_bounds();
    let max_x = (bounds.width - size.x).max(0);
    let max_y = (bounds.height - size.y).max(0);

    for _ in 0..max_attempts {
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);
        let rect = PixelRect::new(x, y, size.x, size.y);
        if !rect.is_empty() && grid.is_rect_walkable(&rect) {
            return Ok(Vec2::new(x as f32, y as f32));
        }
    }

    log::warn!(
        "No spawn position for a {}x{} entity after {max_attempts} attempts",
        size.x,
        size.y
    );
    Err(no_position)
}
