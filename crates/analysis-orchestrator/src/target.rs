//! Target price projection.
//!
//! The base move is interpolated from calibrated confidence and then scaled
//! by volatility, technical/sentiment conviction, market backdrop and recent
//! momentum before being clamped to the configured range.

use analysis_core::{Direction, FeatureRecord};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

const VOLATILITY_NORM: f64 = 1.8;
const VOLATILITY_MULTIPLIER_CAP: f64 = 1.6;
/// Share of the same-direction day move the projection must at least match.
const MOMENTUM_FLOOR_SHARE: f64 = 0.8;

/// Inputs the projector needs beyond the feature record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub current_price: f64,
    pub confidence: f64,
    pub direction: Direction,
    pub technical: f64,
    pub sentiment: f64,
    pub global_markets: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTarget {
    pub predicted_price: f64,
    /// Signed percent move; sign matches the direction.
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProjector {
    min_confidence: f64,
    max_confidence: f64,
    min_move_percent: f64,
    max_move_percent: f64,
    move_floor_percent: f64,
    move_cap_percent: f64,
}

impl Default for TargetProjector {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl TargetProjector {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            max_confidence: config.max_confidence,
            min_move_percent: config.min_move_percent,
            max_move_percent: config.max_move_percent,
            move_floor_percent: config.move_floor_percent,
            move_cap_percent: config.move_cap_percent,
        }
    }

    /// Unsigned move at a given confidence, before any scaling.
    pub fn base_move(&self, confidence: f64) -> f64 {
        let span = self.max_confidence - self.min_confidence;
        let factor = if span > 0.0 {
            ((confidence - self.min_confidence) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.min_move_percent + (self.max_move_percent - self.min_move_percent) * factor
    }

    pub fn project(&self, input: &ProjectionInput, features: &FeatureRecord) -> PriceTarget {
        let volatility = features.number_or("volatility", 1.0);
        let volume_ratio = features.number_or("volume_ratio", 1.0);
        let change_1d = features.number_or("price_change_1d", 0.0);
        let change_5d = features.number_or("price_change_5d", 0.0);

        let mut change = self.base_move(input.confidence);

        change *= (volatility / VOLATILITY_NORM).min(VOLATILITY_MULTIPLIER_CAP);

        let conviction = input.technical * 0.5 + input.sentiment * 0.6;
        change *= 1.0 + conviction * 0.7;

        // Backdrop only ever extends the move.
        let market = (input.global_markets * 0.2 + (volume_ratio - 1.0) * 0.1).max(0.0);
        change *= 1.0 + market;

        change *= momentum_multiplier(change_1d, change_5d);

        let bullish = input.direction.is_bullish();
        if (bullish && change_1d > 1.0) || (!bullish && change_1d < -1.0) {
            change = change.max(change_1d.abs() * MOMENTUM_FLOOR_SHARE);
        }

        let magnitude = if change.is_nan() {
            self.move_floor_percent
        } else {
            change.clamp(self.move_floor_percent, self.move_cap_percent)
        };
        let change_percent = magnitude * input.direction.sign();

        PriceTarget {
            predicted_price: input.current_price * (1.0 + change_percent / 100.0),
            change_percent,
        }
    }
}

/// Tiered boost for recent (1d) and sustained (5d) moves.
fn momentum_multiplier(change_1d: f64, change_5d: f64) -> f64 {
    let recent = change_1d.abs();
    let short = if recent > 1.5 {
        1.25
    } else if recent > 1.0 {
        1.15
    } else if recent > 0.5 {
        1.05
    } else {
        1.0
    };

    let sustained = change_5d.abs();
    let long = if sustained > 4.0 {
        1.2
    } else if sustained > 2.5 {
        1.12
    } else {
        1.0
    };

    short * long
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(confidence: f64, direction: Direction) -> ProjectionInput {
        ProjectionInput {
            current_price: 100.0,
            confidence,
            direction,
            technical: 0.0,
            sentiment: 0.0,
            global_markets: 0.0,
        }
    }

    #[test]
    fn test_base_move_interpolates() {
        let projector = TargetProjector::default();
        assert_relative_eq!(projector.base_move(0.55), 1.0);
        assert_relative_eq!(projector.base_move(0.98), 8.0, epsilon = 1e-12);
        assert_relative_eq!(projector.base_move(0.765), 4.5, epsilon = 1e-12);
        // Below the floor (possible after the no-neutral push) stays at min.
        assert_relative_eq!(projector.base_move(0.5), 1.0);
    }

    #[test]
    fn test_volatility_multiplier() {
        let projector = TargetProjector::default();
        let features = FeatureRecord::new().with("volatility", 1.8);
        let target = projector.project(&input(0.765, Direction::Up), &features);
        assert_relative_eq!(target.change_percent, 4.5, epsilon = 1e-12);
        assert_relative_eq!(target.predicted_price, 104.5, epsilon = 1e-9);

        let wild = FeatureRecord::new().with("volatility", 9.0);
        let capped = projector.project(&input(0.765, Direction::Up), &wild);
        assert_relative_eq!(capped.change_percent, 4.5 * 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_momentum_tiers() {
        assert_relative_eq!(momentum_multiplier(0.0, 0.0), 1.0);
        assert_relative_eq!(momentum_multiplier(-0.6, 0.0), 1.05);
        assert_relative_eq!(momentum_multiplier(1.2, 3.0), 1.15 * 1.12);
        assert_relative_eq!(momentum_multiplier(-2.0, -5.0), 1.25 * 1.2);
    }

    #[test]
    fn test_same_direction_day_move_floor() {
        let projector = TargetProjector::default();
        let features = FeatureRecord::new().with("price_change_1d", -6.0);
        let target = projector.project(&input(0.56, Direction::Down), &features);
        assert_relative_eq!(target.change_percent, -4.8, epsilon = 1e-12);

        // An opposing day move does not set a floor.
        let up = projector.project(&input(0.56, Direction::Up), &features);
        assert!(up.change_percent < 4.8);
        assert!(up.change_percent > 0.0);
    }

    #[test]
    fn test_clamped_and_signed() {
        let projector = TargetProjector::default();
        let hot = FeatureRecord::new()
            .with("volatility", 5.0)
            .with("volume_ratio", 4.0)
            .with("price_change_1d", 3.0)
            .with("price_change_5d", 9.0);
        let strong = ProjectionInput {
            technical: 1.0,
            sentiment: 1.0,
            global_markets: 1.0,
            ..input(0.98, Direction::Up)
        };
        assert_relative_eq!(projector.project(&strong, &hot).change_percent, 10.0);

        let quiet = FeatureRecord::new().with("volatility", 0.1);
        let weak = ProjectionInput {
            technical: -1.0,
            sentiment: -1.0,
            ..input(0.55, Direction::Down)
        };
        let target = projector.project(&weak, &quiet);
        assert_relative_eq!(target.change_percent, -0.5);
        assert!(target.predicted_price < 100.0);
    }
}
