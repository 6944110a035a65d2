//! Ensemble signal engine.
//!
//! Runs the component scorers over one feature record, aggregates them into
//! a weighted composite, calibrates a bullish probability, projects a price
//! target and assembles the rationale. Every call is independent; the engine
//! holds only read-only configuration and can be shared across threads.

use analysis_core::{round_to, AnalysisError, Direction, FeatureRecord};
use chrono::Utc;
use confidence_calibrator::{CalibrationInput, ProbabilityCalibrator};
use market_influence::{asian_influence, european_influence, local_influence};
use sentiment_analysis::KeywordTables;
use technical_analysis::correction_warning;

pub mod composite;
pub mod config;
pub mod report;
pub mod signals;
pub mod target;


pub use composite::ComponentScores;
pub use config::{ComponentWeights, EngineConfig};
pub use report::{
    Prediction, PredictionFailure, PredictionReport, PredictionResponse, RegionAttribution,
    RegionBreakdown, ScoreBreakdown,
};
pub use signals::{generate_signals, top_reasons, SignalContext};
pub use target::{PriceTarget, ProjectionInput, TargetProjector};

pub const MODEL_VERSION: &str = "6.0.0";

pub struct EnsembleEngine {
    config: EngineConfig,
    keywords: KeywordTables,
    calibrator: ProbabilityCalibrator,
    projector: TargetProjector,
}

impl Default for EnsembleEngine {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl EnsembleEngine {
    pub fn new(config: EngineConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            keywords: KeywordTables::new(),
            calibrator: ProbabilityCalibrator::new(config.min_confidence, config.max_confidence)
                .with_mirrored_bounds(config.mirrored_bounds),
            projector: TargetProjector::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Predict for one record. Never fails: errors become a
    /// [`PredictionResponse::Failure`].
    pub fn predict(&self, features: &FeatureRecord) -> PredictionResponse {
        match self.try_predict(features) {
            Ok(report) => PredictionResponse::Success(Box::new(report)),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                PredictionResponse::Failure(PredictionFailure {
                    success: false,
                    error: e.to_string(),
                    model_version: MODEL_VERSION.to_string(),
                    timestamp: Utc::now(),
                })
            }
        }
    }

    pub fn try_predict(&self, features: &FeatureRecord) -> Result<PredictionReport, AnalysisError> {
        let current_price = match features.number("current_price") {
            Some(price) if price > 0.0 => price,
            _ => {
                return Err(AnalysisError::InvalidData(
                    "current_price must be a positive number".to_string(),
                ))
            }
        };

        let weights = &self.config.weights;
        let mut scores = ComponentScores::from_features(features, &self.keywords);

        let price_change_1d = features.number_or("price_change_1d", 0.0);
        if let Some(original) = scores.dampen_contradicted_sentiment(price_change_1d) {
            tracing::warn!(
                "Price moved {:.1}% against sentiment {:.3}, reducing to {:.3}",
                price_change_1d,
                original,
                scores.sentiment
            );
        }

        tracing::debug!(
            technical = scores.technical,
            sentiment = scores.sentiment,
            global_markets = scores.global_markets,
            volume = scores.volume,
            fundamentals = scores.fundamentals,
            intraday = scores.intraday,
            "component scores"
        );

        let asian = asian_influence(features);
        let european = european_influence(features);
        let local = local_influence(features);
        tracing::debug!(
            asian = asian.score,
            european = european.score,
            local = local.score,
            local_source = ?local.source,
            "region scores"
        );

        let composite = scores.composite(weights);
        if !composite.is_finite() {
            return Err(AnalysisError::CalculationError(format!(
                "composite score is not finite: {}",
                composite
            )));
        }

        let calibrated = self.calibrator.calibrate(&CalibrationInput {
            composite,
            technical: scores.technical,
            sentiment: scores.sentiment,
            global_markets: scores.global_markets,
            intraday: scores.intraday,
            volatility: features.number_or("volatility", 1.0),
        });

        let direction = Direction::from_bullish_probability(calibrated.bullish_probability);
        let confidence = calibrated.confidence();

        let target = self.projector.project(
            &ProjectionInput {
                current_price,
                confidence,
                direction,
                technical: scores.technical,
                sentiment: scores.sentiment,
                global_markets: scores.global_markets,
            },
            features,
        );

        let signals = generate_signals(
            &SignalContext {
                direction,
                confidence,
                technical: scores.technical,
                sentiment: scores.sentiment,
            },
            features,
        );
        let reasons = top_reasons(features, scores.technical, scores.sentiment);
        let warning = correction_warning(features);

        tracing::info!(
            "Prediction: {} ({:.1}% confidence, composite {:.3}, target {:+.2}%)",
            direction.to_label(),
            confidence * 100.0,
            composite,
            target.change_percent
        );

        let bullish_probability = round_to(calibrated.bullish_probability, 4);
        let region = |a: RegionAttribution| RegionAttribution {
            score: round_to(a.score, 3),
            impact_percent: round_to(a.impact_percent, 4),
            contribution: round_to(a.contribution, 4),
        };

        Ok(PredictionReport {
            success: true,
            model_version: MODEL_VERSION.to_string(),
            prediction: Prediction {
                direction,
                label: direction.to_label().to_string(),
                bullish_probability,
                bearish_probability: 1.0 - bullish_probability,
                confidence: round_to(confidence, 4),
                predicted_price: round_to(target.predicted_price, 2),
                target_change_percent: round_to(target.change_percent, 2),
                current_price: round_to(current_price, 2),
            },
            scores: ScoreBreakdown {
                components: scores.rounded(3),
                composite: round_to(composite, 3),
            },
            contributions: scores.contributions(weights).rounded(3),
            regions: RegionBreakdown {
                asian: region(RegionAttribution::from(&asian)),
                european: region(RegionAttribution::from(&european)),
                local: region(RegionAttribution::from(&local)),
            },
            local_factors: local.factors,
            correction_warning: warning,
            signals,
            top_reasons: reasons,
            timestamp: Utc::now(),
        })
    }
}
