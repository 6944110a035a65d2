use analysis_core::{AnalysisError, Component};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Tolerance on the weight sum.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Composite weights for the six components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub technical: f64,      // 0.25
    pub sentiment: f64,      // 0.35
    pub global_markets: f64, // 0.15
    pub volume: f64,         // 0.12
    pub fundamentals: f64,   // 0.08
    pub intraday: f64,       // 0.05
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            technical: 0.25,
            sentiment: 0.35,
            global_markets: 0.15,
            volume: 0.12,
            fundamentals: 0.08,
            intraday: 0.05,
        }
    }
}

impl ComponentWeights {
    pub fn weight(&self, component: Component) -> f64 {
        match component {
            Component::Technical => self.technical,
            Component::Sentiment => self.sentiment,
            Component::GlobalMarkets => self.global_markets,
            Component::Volume => self.volume,
            Component::Fundamentals => self.fundamentals,
            Component::Intraday => self.intraday,
        }
    }

    pub fn total(&self) -> f64 {
        Component::ALL.iter().map(|c| self.weight(*c)).sum()
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for component in Component::ALL {
            let w = self.weight(component);
            if !w.is_finite() || w < 0.0 {
                return Err(AnalysisError::Config(format!(
                    "weight for {} must be non-negative, got {}",
                    component.as_str(),
                    w
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AnalysisError::Config(format!(
                "component weights must sum to 1.0, got {:.6}",
                total
            )));
        }
        Ok(())
    }
}

/// Engine tuning: confidence bounds, target-move range and composite weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_confidence: f64,     // 0.55
    pub max_confidence: f64,     // 0.98
    pub min_move_percent: f64,   // 1.0, move at min confidence
    pub max_move_percent: f64,   // 8.0, move at max confidence
    pub move_floor_percent: f64, // 0.5
    pub move_cap_percent: f64,   // 10.0
    /// Clamp bearish probabilities to the mirrored interval; off by default.
    #[serde(default)]
    pub mirrored_bounds: bool,
    pub weights: ComponentWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.55,
            max_confidence: 0.98,
            min_move_percent: 1.0,
            max_move_percent: 8.0,
            move_floor_percent: 0.5,
            move_cap_percent: 10.0,
            mirrored_bounds: false,
            weights: ComponentWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the process environment (and `.env` when present), falling
    /// back to the defaults for any `SIGNAL_*` variable that is not set.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let w = defaults.weights;

        let read = |key: &str, default: f64| -> Result<f64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("{} is not a number: {:?}", key, raw)),
                None => Ok(default),
            }
        };

        let mirrored_bounds = match lookup("SIGNAL_MIRRORED_BOUNDS") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("SIGNAL_MIRRORED_BOUNDS is not a boolean: {:?}", raw))?,
            None => defaults.mirrored_bounds,
        };

        let config = Self {
            min_confidence: read("SIGNAL_MIN_CONFIDENCE", defaults.min_confidence)?,
            max_confidence: read("SIGNAL_MAX_CONFIDENCE", defaults.max_confidence)?,
            min_move_percent: read("SIGNAL_MIN_MOVE_PERCENT", defaults.min_move_percent)?,
            max_move_percent: read("SIGNAL_MAX_MOVE_PERCENT", defaults.max_move_percent)?,
            move_floor_percent: read("SIGNAL_MOVE_FLOOR_PERCENT", defaults.move_floor_percent)?,
            move_cap_percent: read("SIGNAL_MOVE_CAP_PERCENT", defaults.move_cap_percent)?,
            mirrored_bounds,
            weights: ComponentWeights {
                technical: read("SIGNAL_WEIGHT_TECHNICAL", w.technical)?,
                sentiment: read("SIGNAL_WEIGHT_SENTIMENT", w.sentiment)?,
                global_markets: read("SIGNAL_WEIGHT_GLOBAL_MARKETS", w.global_markets)?,
                volume: read("SIGNAL_WEIGHT_VOLUME", w.volume)?,
                fundamentals: read("SIGNAL_WEIGHT_FUNDAMENTALS", w.fundamentals)?,
                intraday: read("SIGNAL_WEIGHT_INTRADAY", w.intraday)?,
            },
        };

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let in_open_half = |v: f64| v > 0.5 && v < 1.0;
        if !in_open_half(self.min_confidence) || !in_open_half(self.max_confidence) {
            return Err(AnalysisError::Config(format!(
                "confidence bounds must lie in (0.5, 1), got [{}, {}]",
                self.min_confidence, self.max_confidence
            )));
        }
        if self.min_confidence >= self.max_confidence {
            return Err(AnalysisError::Config(format!(
                "min_confidence {} must be below max_confidence {}",
                self.min_confidence, self.max_confidence
            )));
        }

        if !(self.min_move_percent >= 0.0 && self.min_move_percent <= self.max_move_percent) {
            return Err(AnalysisError::Config(format!(
                "move range [{}, {}] is not ordered",
                self.min_move_percent, self.max_move_percent
            )));
        }
        if !(self.move_floor_percent > 0.0 && self.move_floor_percent <= self.move_cap_percent) {
            return Err(AnalysisError::Config(format!(
                "move clamp [{}, {}] is not ordered",
                self.move_floor_percent, self.move_cap_percent
            )));
        }

        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_defaults() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("SIGNAL_MIN_CONFIDENCE", "0.6"),
            ("SIGNAL_MOVE_CAP_PERCENT", " 12 "),
        ]))
        .unwrap();
        assert_eq!(config.min_confidence, 0.6);
        assert_eq!(config.move_cap_percent, 12.0);
        assert_eq!(config.max_confidence, 0.98);
    }

    #[test]
    fn test_lookup_mirrored_bounds() {
        let config = EngineConfig::from_lookup(lookup(&[("SIGNAL_MIRRORED_BOUNDS", "true")])).unwrap();
        assert!(config.mirrored_bounds);

        let err = EngineConfig::from_lookup(lookup(&[("SIGNAL_MIRRORED_BOUNDS", "yes")])).unwrap_err();
        assert!(err.to_string().contains("SIGNAL_MIRRORED_BOUNDS"));
    }

    #[test]
    fn test_unparseable_value() {
        let err = EngineConfig::from_lookup(lookup(&[("SIGNAL_MAX_CONFIDENCE", "high")])).unwrap_err();
        assert!(err.to_string().contains("SIGNAL_MAX_CONFIDENCE"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let result = EngineConfig::from_lookup(lookup(&[("SIGNAL_WEIGHT_TECHNICAL", "0.5")]));
        assert!(result.is_err());

        let weights = ComponentWeights {
            volume: -0.12,
            intraday: 0.29,
            ..ComponentWeights::default()
        };
        assert!(matches!(weights.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_confidence_bounds_rejected() {
        let inverted = EngineConfig {
            min_confidence: 0.9,
            max_confidence: 0.6,
            ..EngineConfig::default()
        };
        assert!(inverted.validate().is_err());

        let below_half = EngineConfig {
            min_confidence: 0.4,
            ..EngineConfig::default()
        };
        assert!(below_half.validate().is_err());

        let certain = EngineConfig {
            max_confidence: 1.0,
            ..EngineConfig::default()
        };
        assert!(certain.validate().is_err());
    }
}
