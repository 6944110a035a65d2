use analysis_core::{clamp_unit, FeatureRecord, MarketSentiment};
use serde::{Deserialize, Serialize};

pub const ASIAN_IMPACT_CEILING: f64 = 10.0;
pub const EUROPEAN_IMPACT_CEILING: f64 = 15.0;

/// A region's directional score and how much of the projected move is
/// attributed to it. The impact is for display, it never weights the
/// composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionInfluence {
    pub score: f64,
    pub impact_percent: f64,
}

impl RegionInfluence {
    /// Score scaled by the impact expressed as a fraction.
    pub fn contribution(&self) -> f64 {
        self.score * self.impact_percent / 100.0
    }
}

/// Per-region coefficients. A sentiment label sets a floor impact; an
/// unlabelled move is sized from the raw change alone.
struct RegionProfile {
    label_base_score: f64,
    label_change_slope: f64,
    positive_impact: (f64, f64),
    negative_impact: (f64, f64),
    label_impact_slope: f64,
    moderate_impact_slope: f64,
    moderate_impact_cap: f64,
    strength_score: f64,
    strength_impact: f64,
    ceiling: f64,
}

const ASIA: RegionProfile = RegionProfile {
    label_base_score: 0.4,
    label_change_slope: 0.3,
    positive_impact: (2.5, 5.0),
    negative_impact: (1.5, 4.0),
    label_impact_slope: 2.0,
    moderate_impact_slope: 1.5,
    moderate_impact_cap: 3.0,
    strength_score: 0.3,
    strength_impact: 1.5,
    ceiling: ASIAN_IMPACT_CEILING,
};

const EUROPE: RegionProfile = RegionProfile {
    label_base_score: 0.45,
    label_change_slope: 0.35,
    positive_impact: (3.5, 8.0),
    negative_impact: (2.5, 7.0),
    label_impact_slope: 2.5,
    moderate_impact_slope: 2.0,
    moderate_impact_cap: 5.0,
    strength_score: 0.35,
    strength_impact: 2.0,
    ceiling: EUROPEAN_IMPACT_CEILING,
};

fn region_influence(
    profile: &RegionProfile,
    sentiment: MarketSentiment,
    change: f64,
    strength: f64,
) -> RegionInfluence {
    let magnitude = change.abs();
    let (score, impact) = match sentiment {
        MarketSentiment::Positive => {
            let (base, cap) = profile.positive_impact;
            (
                (profile.label_base_score + magnitude * profile.label_change_slope).min(1.0),
                (magnitude * profile.label_impact_slope + base).min(cap),
            )
        }
        MarketSentiment::Negative => {
            let (base, cap) = profile.negative_impact;
            (
                (-profile.label_base_score - magnitude * profile.label_change_slope).max(-1.0),
                (magnitude * profile.label_impact_slope + base).min(cap),
            )
        }
        MarketSentiment::Neutral if magnitude > 0.5 => (
            change.tanh() * 0.6,
            (magnitude * profile.moderate_impact_slope).min(profile.moderate_impact_cap),
        ),
        MarketSentiment::Neutral => {
            let score = if strength > 0.0 {
                strength * profile.strength_score
            } else {
                0.0
            };
            (score, strength * profile.strength_impact)
        }
    };

    RegionInfluence {
        score: clamp_unit(score),
        impact_percent: impact.clamp(0.0, profile.ceiling),
    }
}

/// Asian session influence; impact within [0, 10].
pub fn asian_influence(features: &FeatureRecord) -> RegionInfluence {
    region_influence(
        &ASIA,
        features.sentiment("asian_market_sentiment"),
        features.number_or("asian_market_change", 0.0),
        features.number_or("asian_market_strength", 0.0),
    )
}

/// European session influence; impact within [0, 15].
pub fn european_influence(features: &FeatureRecord) -> RegionInfluence {
    region_influence(
        &EUROPE,
        features.sentiment("european_market_sentiment"),
        features.number_or("european_market_change", 0.0),
        features.number_or("european_market_strength", 0.0),
    )
}
