//! Tile-grid collision resolution
//!
//! Movement is resolved one axis at a time, X first, then Y. Resolving the
//! axes jointly would let a diagonal step slip through the shared corner of
//! two solid tiles.
//!
//! For each axis the full displacement is tried first. If the grid rejects
//! it, the auxiliary obstacle rects get a say (when any were supplied), and
//! failing that the body creeps forward one pixel at a time until the next
//! pixel would enter a solid tile.

use glam::{IVec2, Vec2};

use super::Body;
use crate::world::{Grid, PixelRect};

/// A movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const fn offset(self, amount: i32) -> IVec2 {
        match self {
            Self::Horizontal => IVec2::new(amount, 0),
            Self::Vertical => IVec2::new(0, amount),
        }
    }
}

/// Resolves requested displacements against the grid.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver<'a> {
    grid: &'a Grid,
    obstacles: &'a [PixelRect],
}

impl<'a> CollisionResolver<'a> {
    /// Resolver with no auxiliary obstacles
    #[must_use]
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            obstacles: &[],
        }
    }

    /// Resolver that also accepts full-step moves clear of `obstacles` when
    /// the grid test rejects them
    #[must_use]
    pub fn with_obstacles(grid: &'a Grid, obstacles: &'a [PixelRect]) -> Self {
        Self { grid, obstacles }
    }

    #[must_use]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Whether a rect clears every auxiliary obstacle.
    ///
    /// Always false without obstacles: an empty list never overrides the grid.
    fn clear_of_obstacles(&self, rect: &PixelRect) -> bool {
        !self.obstacles.is_empty() && !self.obstacles.iter().any(|o| o.intersects(rect))
    }

    /// Whether an entity may occupy the rect
    #[must_use]
    pub fn can_occupy(&self, rect: &PixelRect) -> bool {
        self.grid.is_rect_walkable(rect) || self.clear_of_obstacles(rect)
    }

    /// Whether a move of `delta` would be accepted whole, X then Y
    #[must_use]
    pub fn can_translate(&self, rect: &PixelRect, delta: IVec2) -> bool {
        let horizontal = rect.translated(delta.x, 0);
        if delta.x != 0 && !self.can_occupy(&horizontal) {
            return false;
        }
        delta.y == 0 || self.can_occupy(&horizontal.translated(0, delta.y))
    }

    /// Move along one axis and return the distance actually travelled
    pub fn move_axis(&self, body: &mut Body, axis: Axis, amount: i32) -> i32 {
        if amount == 0 {
            return 0;
        }

        let full = axis.offset(amount);
        let target = body.rect().translated(full.x, full.y);
        if self.grid.is_rect_walkable(&target) || self.clear_of_obstacles(&target) {
            body.translate(full);
            return amount;
        }

        // Slide up to the wall
        let step = amount.signum();
        let mut moved = 0;
        while moved != amount {
            let unit = axis.offset(step);
            let probe = body.rect().translated(unit.x, unit.y);
            if !self.grid.is_rect_walkable(&probe) {
                break;
            }
            body.translate(unit);
            moved += step;
        }
        moved
    }

    /// Move by `(delta.x, delta.y)`, X then Y, returning the applied
    /// displacement
    pub fn move_by(&self, body: &mut Body, delta: IVec2) -> IVec2 {
        let dx = self.move_axis(body, Axis::Horizontal, delta.x);
        let dy = self.move_axis(body, Axis::Vertical, delta.y);
        IVec2::new(dx, dy)
    }

    /// Move along a sub-pixel vector, rounded to whole pixels per axis
    pub fn move_vector(&self, body: &mut Body, delta: Vec2) -> IVec2 {
        self.move_by(body, delta.round().as_ivec2())
    }
}
