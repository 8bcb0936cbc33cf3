//! Moving bodies

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::world::PixelRect;

/// Sprite facing, selected from the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

impl Facing {
    /// Facing for a movement vector: the larger axis wins, ties go to the
    /// horizontal axis. A zero vector gives `None` (keep the current facing).
    #[must_use]
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v.x == 0.0 && v.y == 0.0 {
            return None;
        }
        if v.x.abs() >= v.y.abs() {
            Some(if v.x > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if v.y > 0.0 { Self::Down } else { Self::Up })
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Position and collision box of an entity.
///
/// `position` is the authoritative sub-pixel top-left corner; `rect` is
/// re-derived from it by rounding whenever the position changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    position: Vec2,
    rect: PixelRect,
}

impl Body {
    /// Create a body with its top-left corner at `position`
    #[must_use]
    pub fn new(position: Vec2, size: IVec2) -> Self {
        Self {
            position,
            rect: PixelRect::from_position(position, size),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn size(&self) -> IVec2 {
        self.rect.size()
    }

    /// Center of the collision box
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.rect.size().as_vec2() * 0.5
    }

    /// Teleport to a new top-left position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rect = PixelRect::from_position(position, self.rect.size());
    }

    /// Move by a whole number of pixels
    pub fn translate(&mut self, delta: IVec2) {
        self.set_position(self.position + delta.as_vec2());
    }
}
