use analysis_core::{Direction, Signal};
use chrono::{DateTime, Utc};
use market_influence::{LocalFactors, LocalInfluence, RegionInfluence};
use serde::Serialize;
use technical_analysis::CorrectionWarning;

use crate::composite::ComponentScores;

/// Direction, calibrated probabilities and the price target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub direction: Direction,
    /// BULLISH or BEARISH.
    pub label: String,
    pub bullish_probability: f64,
    pub bearish_probability: f64,
    pub confidence: f64,
    pub predicted_price: f64,
    pub target_change_percent: f64,
    pub current_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    #[serde(flatten)]
    pub components: ComponentScores,
    pub composite: f64,
}

/// Attribution of the projected move to one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionAttribution {
    pub score: f64,
    pub impact_percent: f64,
    pub contribution: f64,
}

impl From<&RegionInfluence> for RegionAttribution {
    fn from(region: &RegionInfluence) -> Self {
        Self {
            score: region.score,
            impact_percent: region.impact_percent,
            contribution: region.contribution(),
        }
    }
}

impl From<&LocalInfluence> for RegionAttribution {
    fn from(local: &LocalInfluence) -> Self {
        Self {
            score: local.score,
            impact_percent: local.impact_percent,
            contribution: local.contribution(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionBreakdown {
    pub asian: RegionAttribution,
    pub european: RegionAttribution,
    pub local: RegionAttribution,
}

/// Successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub success: bool,
    pub model_version: String,
    pub prediction: Prediction,
    pub scores: ScoreBreakdown,
    pub contributions: ComponentScores,
    pub regions: RegionBreakdown,
    pub local_factors: LocalFactors,
    pub correction_warning: CorrectionWarning,
    pub signals: Vec<Signal>,
    pub top_reasons: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Typed failure record. Carries no partial scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFailure {
    pub success: bool,
    pub error: String,
    pub model_version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success(Box<PredictionReport>),
    Failure(PredictionFailure),
}

impl PredictionResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success(_))
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        match self {
            PredictionResponse::Success(report) => Some(report.as_ref()),
            PredictionResponse::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionResponse::Success(_) => None,
            PredictionResponse::Failure(failure) => Some(&failure.error),
        }
    }
}
