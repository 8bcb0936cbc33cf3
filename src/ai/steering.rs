//! Steering behaviors for pixel-space movement
//!
//! Behaviors return the displacement an agent wants this tick; the
//! collision resolver decides how much of it actually happens.

use glam::{IVec2, Vec2};

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Requested displacement in pixels
    pub linear: Vec2,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self { linear: Vec2::ZERO };

    /// Whether any movement is requested
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.linear == Vec2::ZERO
    }

    /// The request rounded to whole pixels per axis
    #[must_use]
    pub fn pixels(&self) -> IVec2 {
        self.linear.round().as_ivec2()
    }
}

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Calculate steering for an agent at `position`
    fn calculate(&self, position: Vec2) -> SteeringOutput;
}

/// Seek behavior - full speed toward the target
#[derive(Debug, Clone)]
pub struct Seek {
    /// Target position
    pub target: Vec2,
    /// Pixels per tick
    pub speed: f32,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: Vec2, speed: f32) -> Self {
        Self { target, speed }
    }
}

impl SteeringBehavior for Seek {
    fn calculate(&self, position: Vec2) -> SteeringOutput {
        SteeringOutput {
            linear: (self.target - position).normalize_or_zero() * self.speed,
        }
    }
}

/// Arrive behavior - move toward the target without overshooting it and
/// stop once inside `target_radius`
#[derive(Debug, Clone)]
pub struct Arrive {
    /// Target position
    pub target: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Stopping distance
    pub target_radius: f32,
}

impl Arrive {
    /// Create a new arrive behavior
    #[must_use]
    pub fn new(target: Vec2, speed: f32, target_radius: f32) -> Self {
        Self {
            target,
            speed,
            target_radius,
        }
    }

    /// Whether `position` is already inside the stopping distance
    #[must_use]
    pub fn arrived(&self, position: Vec2) -> bool {
        position.distance(self.target) < self.target_radius
    }
}

impl SteeringBehavior for Arrive {
    fn calculate(&self, position: Vec2) -> SteeringOutput {
        let to_target = self.target - position;
        let distance = to_target.length();

        if distance < self.target_radius {
            return SteeringOutput::ZERO;
        }

        SteeringOutput {
            linear: to_target.normalize_or_zero() * self.speed.min(distance),
        }
    }
}
