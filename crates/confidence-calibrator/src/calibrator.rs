//! Probability Calibration
//!
//! Maps the weighted composite score to a bullish probability, then applies
//! the conflict rules that keep the output consistent with the composite:
//! alignment boost, volatility damping, confidence bounds, the hard
//! composite override and the no-neutral-zone push.

use serde::{Deserialize, Serialize};

/// Composite magnitude beyond which the direction is considered unambiguous.
const OVERRIDE_THRESHOLD: f64 = 0.1;
/// Volatility reading above which extremes are pulled back.
const HIGH_VOLATILITY: f64 = 2.5;
const VOLATILITY_DAMPING: f64 = 0.6;
const ALIGNMENT_BOOST_CAP: f64 = 0.12;

/// Lower/upper edges of the neutral zone (exclusive).
pub const NEUTRAL_ZONE: (f64, f64) = (0.45, 0.55);

/// Scores the calibrator needs besides the composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub composite: f64,
    pub technical: f64,
    pub sentiment: f64,
    pub global_markets: f64,
    pub intraday: f64,
    pub volatility: f64,
}

/// Which rule, if any, forced the probability past the composite threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeOverride {
    ForcedBearish,
    ForcedBullish,
}

/// A calibrated probability together with a trace of the rules that fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedProbability {
    pub bullish_probability: f64,
    /// Output of the tanh mapping before any adjustment.
    pub base_probability: f64,
    /// Signed boost applied for technical/sentiment agreement.
    pub alignment_boost: f64,
    pub volatility_damped: bool,
    pub composite_override: Option<CompositeOverride>,
    pub neutral_zone_adjusted: bool,
}

impl CalibratedProbability {
    pub fn bearish_probability(&self) -> f64 {
        1.0 - self.bullish_probability
    }

    /// Probability of the predicted side.
    pub fn confidence(&self) -> f64 {
        self.bullish_probability.max(self.bearish_probability())
    }
}

/// Stateless calibrator configured only by its confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityCalibrator {
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Clamp bearish-leaning probabilities to `[1-max, 1-min]` instead of
    /// `[min, max]`. Off by default: the plain clamp leaves bearish outcomes
    /// to the composite override.
    #[serde(default)]
    pub mirrored_bounds: bool,
}

impl Default for ProbabilityCalibrator {
    fn default() -> Self {
        Self::new(0.55, 0.98)
    }
}

impl ProbabilityCalibrator {
    pub fn new(min_confidence: f64, max_confidence: f64) -> Self {
        Self {
            min_confidence,
            max_confidence,
            mirrored_bounds: false,
        }
    }

    pub fn with_mirrored_bounds(mut self, mirrored: bool) -> Self {
        self.mirrored_bounds = mirrored;
        self
    }

    /// Smooth map from composite in [-1, 1] to a probability in (0.05, 0.95).
    pub fn base_probability(composite: f64) -> f64 {
        0.5 + 0.45 * (1.5 * composite).tanh()
    }

    fn alignment_boost(technical: f64, sentiment: f64) -> f64 {
        let aligned = (technical > 0.6 && sentiment > 0.5) || (technical < -0.6 && sentiment < -0.5);
        if aligned {
            ((technical * sentiment).abs() * 0.1).min(ALIGNMENT_BOOST_CAP)
        } else {
            0.0
        }
    }

    fn dampen(p: f64) -> f64 {
        if p > 0.75 {
            0.75 + (p - 0.75) * VOLATILITY_DAMPING
        } else if p < 0.25 {
            0.25 - (0.25 - p) * VOLATILITY_DAMPING
        } else {
            p
        }
    }

    fn bound(&self, p: f64) -> f64 {
        if self.mirrored_bounds && p < 0.5 {
            p.clamp(1.0 - self.max_confidence, 1.0 - self.min_confidence)
        } else {
            p.clamp(self.min_confidence, self.max_confidence)
        }
    }

    pub fn calibrate(&self, input: &CalibrationInput) -> CalibratedProbability {
        let base = Self::base_probability(input.composite);
        let mut p = base;

        let boost = Self::alignment_boost(input.technical, input.sentiment);
        let signed_boost = if p > 0.5 { boost } else { -boost };
        p += signed_boost;

        let volatility_damped = input.volatility > HIGH_VOLATILITY && (p > 0.75 || p < 0.25);
        if input.volatility > HIGH_VOLATILITY {
            p = Self::dampen(p);
        }

        p = self.bound(p);

        // Runs after boost and damping so an unambiguous composite always wins.
        let composite_override = if input.composite < -OVERRIDE_THRESHOLD && p > 0.44 {
            p = 0.44;
            Some(CompositeOverride::ForcedBearish)
        } else if input.composite > OVERRIDE_THRESHOLD && p < 0.56 {
            p = 0.56;
            Some(CompositeOverride::ForcedBullish)
        } else {
            None
        };

        let in_neutral_zone = p > NEUTRAL_ZONE.0 && p < NEUTRAL_ZONE.1;
        if in_neutral_zone {
            let strongest = [input.technical, input.sentiment, input.global_markets, input.intraday]
                .iter()
                .fold(0.0_f64, |acc, s| acc.max(s.abs()));
            p = if strongest > 0.3 {
                if input.composite >= 0.0 {
                    0.58
                } else {
                    0.42
                }
            } else if input.composite > 0.0 {
                0.56
            } else {
                0.44
            };
        }

        tracing::debug!(
            composite = input.composite,
            base,
            boost = signed_boost,
            volatility_damped,
            ?composite_override,
            neutral_zone_adjusted = in_neutral_zone,
            bullish_probability = p,
            "calibrated probability"
        );

        CalibratedProbability {
            bullish_probability: p,
            base_probability: base,
            alignment_boost: signed_boost,
            volatility_damped,
            composite_override,
            neutral_zone_adjusted: in_neutral_zone,
        }
    }
}
