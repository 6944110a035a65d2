//! Numeric helpers shared by the component scorers.
//!
//! Scores live on a signed unit scale: positive is bullish, negative is
//! bearish and the magnitude is conviction. Raw indicator readings are pushed
//! through a saturating transform so one extreme input cannot dominate a sum.

/// Saturating transform: `tanh(value / scale)`. Result is in (-1, 1).
pub fn squash(value: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }
    (value / scale).tanh()
}

/// Clamp to the closed unit interval [-1, 1]. NaN collapses to neutral.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}

/// Round to a fixed number of decimal places for presentation.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Running sum plus the number of sub-signals that actually contributed.
///
/// Scorers average over evaluated sub-signals only, so a record missing
/// optional inputs is not diluted toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    sum: f64,
    count: u32,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluated sub-signal.
    pub fn push(&mut self, contribution: f64) {
        self.sum += contribution;
        self.count += 1;
    }

    /// Adjust the running sum without counting a new sub-signal.
    pub fn nudge(&mut self, adjustment: f64) {
        self.sum += adjustment;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Average over evaluated sub-signals, clamped to [-1, 1]. Zero when
    /// nothing was evaluated.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        clamp_unit(self.sum / self.count as f64)
    }
}
