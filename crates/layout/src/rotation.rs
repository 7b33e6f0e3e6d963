use std::f64::consts::TAU;
use std::time::Duration;

/// Idle spin of the ring layout.
///
/// Feeds `LayoutContext::rotation`; the offset stays within `[0, TAU)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationClock {
    offset: f64,
    /// Radians per second
    speed: f64,
}

impl RotationClock {
    #[must_use]
    pub const fn new(speed: f64) -> Self {
        Self { offset: 0.0, speed }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.offset = phase.rem_euclid(TAU);
        self
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Advance by one frame of length `elapsed` and return the new offset
    pub fn advance(&mut self, elapsed: Duration) -> f64 {
        self.offset = (self.offset + self.speed * elapsed.as_secs_f64()).rem_euclid(TAU);
        self.offset
    }
}

impl Default for RotationClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}
