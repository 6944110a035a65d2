use analysis_core::{clamp_unit, squash, FeatureRecord, MarketSentiment};
use serde::{Deserialize, Serialize};

/// Share of the local score taken by the US index term.
const US_MARKETS_WEIGHT: f64 = 0.40;
const OTHER_FACTORS_WEIGHT: f64 = 0.60;

pub const LOCAL_IMPACT_CEILING: f64 = 10.0;

/// Simplified, region-scoped sub-factors behind the local US score. The blend
/// reads them raw; the reported breakdown is clamped to [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalFactors {
    pub technical: f64,
    pub sentiment: f64,
    pub volume: f64,
    pub intraday: f64,
    pub fundamentals: f64,
    pub us_markets: f64,
}

impl LocalFactors {
    fn from_features(features: &FeatureRecord) -> Self {
        let rsi = features.number_or("rsi", 50.0);
        let mut technical = if rsi < 30.0 {
            0.7
        } else if rsi > 70.0 {
            -0.7
        } else if rsi < 40.0 {
            0.3
        } else if rsi > 60.0 {
            -0.3
        } else {
            0.0
        };
        let macd = features.number_or("macd", 0.0);
        if macd != 0.0 {
            technical += macd.tanh() * 0.4;
        }

        let sentiment = squash(features.number_or("news_sentiment_score", 0.0), 5.0) * 0.8;

        let volume_ratio = features.number_or("volume_ratio", 1.0);
        let volume = if volume_ratio > 1.5 {
            0.6
        } else if volume_ratio > 1.2 {
            0.3
        } else if volume_ratio < 0.8 {
            -0.2
        } else {
            0.0
        };

        let intraday = squash(features.number_or("intraday_change_percent", 0.0), 3.0) * 0.5;

        let pe_percentile = features.number_or("pe_percentile", 50.0);
        let fundamentals = (pe_percentile - 50.0) / 50.0 * 0.4
            + squash(features.number_or("earnings_growth", 0.0), 20.0) * 0.3;

        Self {
            technical,
            sentiment,
            volume,
            intraday,
            fundamentals,
            us_markets: us_markets_factor(features),
        }
    }

    fn blend(&self) -> f64 {
        let others =
            (self.technical + self.sentiment + self.volume + self.intraday + self.fundamentals) / 5.0;
        clamp_unit(self.us_markets * US_MARKETS_WEIGHT + others * OTHER_FACTORS_WEIGHT)
    }

    fn clamped(&self) -> Self {
        Self {
            technical: clamp_unit(self.technical),
            sentiment: clamp_unit(self.sentiment),
            volume: clamp_unit(self.volume),
            intraday: clamp_unit(self.intraday),
            fundamentals: clamp_unit(self.fundamentals),
            us_markets: clamp_unit(self.us_markets),
        }
    }
}

/// US index influence (S&P 500, NASDAQ, DOW, Russell), pre-aggregated by the
/// feature supplier. Bearish branch is checked first.
fn us_markets_factor(features: &FeatureRecord) -> f64 {
    let influence = features.number_or("us_market_influence_score", 0.0);
    let sentiment = features.sentiment("us_market_sentiment");

    if sentiment == MarketSentiment::Negative || influence < -0.2 {
        (influence * 1.2).max(-0.9)
    } else if sentiment == MarketSentiment::Positive || influence > 0.2 {
        (influence * 1.2).min(0.9)
    } else {
        influence * 0.8
    }
}

/// Where the local score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalScoreSource {
    /// Supplied by an upstream classifier as `local_us_influence_score`.
    Classifier,
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalInfluence {
    pub score: f64,
    pub impact_percent: f64,
    pub source: LocalScoreSource,
    pub factors: LocalFactors,
}

impl LocalInfluence {
    pub fn contribution(&self) -> f64 {
        self.score * self.impact_percent / 100.0
    }
}

/// Local US influence. A classifier-supplied score is preferred over the
/// rule-based blend; the factor breakdown is reported either way.
pub fn local_influence(features: &FeatureRecord) -> LocalInfluence {
    let factors = LocalFactors::from_features(features);

    let (score, source) = match features.number("local_us_influence_score") {
        Some(supplied) => (clamp_unit(supplied), LocalScoreSource::Classifier),
        None => (factors.blend(), LocalScoreSource::Rules),
    };

    LocalInfluence {
        score,
        impact_percent: local_impact_percent(score),
        source,
        factors: factors.clamped(),
    }
}

/// Tiered impact ladder keyed on score magnitude bands.
///
/// Strong (|s| > 0.5) lands in 6-8%, moderate (> 0.3) in 4-6%, weak in 2-5%;
/// an exactly neutral score keeps a 1% floor.
pub fn local_impact_percent(score: f64) -> f64 {
    let impact = if score > 0.5 {
        6.0 + (score - 0.5) * 4.0
    } else if score > 0.3 {
        4.0 + (score - 0.3) * 10.0
    } else if score > 0.0 {
        2.0 + score * 10.0
    } else if score < -0.5 {
        6.0 + (score + 0.5).abs() * 4.0
    } else if score < -0.3 {
        4.0 + (score + 0.3).abs() * 10.0
    } else if score < 0.0 {
        2.0 + score.abs() * 10.0
    } else {
        1.0
    };
    impact.clamp(0.0, LOCAL_IMPACT_CEILING)
}
