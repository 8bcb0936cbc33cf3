//! Simulation clock

/// Time as seen by the simulation.
///
/// Advanced explicitly by the session on every tick, never read from the
/// wall clock, so runs are reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    elapsed: f32,
    delta: f32,
    ticks: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative steps are treated as zero.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta;
        self.ticks += 1;
    }

    /// Seconds since the session started
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Length of the last tick in seconds
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks advanced
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
