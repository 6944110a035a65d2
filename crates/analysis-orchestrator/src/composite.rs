use analysis_core::{round_to, Component, FeatureRecord};
use fundamental_analysis::fundamental_score;
use market_influence::global_market_score;
use sentiment_analysis::{sentiment_score, KeywordTables};
use serde::{Deserialize, Serialize};
use technical_analysis::{intraday_score, technical_score, volume_score};

use crate::config::ComponentWeights;

/// Day move (percent) beyond which an opposing sentiment reading is halved.
const CONTRADICTION_MOVE: f64 = 2.0;
const CONTRADICTION_SENTIMENT: f64 = 0.2;

/// One value per component, used for both scores and weighted contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub technical: f64,
    pub sentiment: f64,
    pub global_markets: f64,
    pub volume: f64,
    pub fundamentals: f64,
    pub intraday: f64,
}

impl ComponentScores {
    /// Run the six component scorers over the record.
    pub fn from_features(features: &FeatureRecord, keywords: &KeywordTables) -> Self {
        Self {
            technical: technical_score(features),
            sentiment: sentiment_score(features, keywords),
            global_markets: global_market_score(features),
            volume: volume_score(features),
            fundamentals: fundamental_score(features),
            intraday: intraday_score(features),
        }
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Technical => self.technical,
            Component::Sentiment => self.sentiment,
            Component::GlobalMarkets => self.global_markets,
            Component::Volume => self.volume,
            Component::Fundamentals => self.fundamentals,
            Component::Intraday => self.intraday,
        }
    }

    fn map(&self, f: impl Fn(Component, f64) -> f64) -> Self {
        Self {
            technical: f(Component::Technical, self.technical),
            sentiment: f(Component::Sentiment, self.sentiment),
            global_markets: f(Component::GlobalMarkets, self.global_markets),
            volume: f(Component::Volume, self.volume),
            fundamentals: f(Component::Fundamentals, self.fundamentals),
            intraday: f(Component::Intraday, self.intraday),
        }
    }

    /// Score times weight for each component.
    pub fn contributions(&self, weights: &ComponentWeights) -> Self {
        self.map(|c, score| score * weights.weight(c))
    }

    pub fn rounded(&self, places: i32) -> Self {
        self.map(|_, v| round_to(v, places))
    }

    /// Weighted sum. Bounded by [-1, 1] when the weights sum to one.
    pub fn composite(&self, weights: &ComponentWeights) -> f64 {
        Component::ALL
            .iter()
            .map(|c| self.get(*c) * weights.weight(*c))
            .sum()
    }

    /// Halve the sentiment component when the day's price action clearly
    /// contradicts it. Returns the original sentiment when damping applied.
    pub fn dampen_contradicted_sentiment(&mut self, price_change_1d: f64) -> Option<f64> {
        let contradicted = (price_change_1d < -CONTRADICTION_MOVE && self.sentiment > CONTRADICTION_SENTIMENT)
            || (price_change_1d > CONTRADICTION_MOVE && self.sentiment < -CONTRADICTION_SENTIMENT);
        if !contradicted {
            return None;
        }
        let original = self.sentiment;
        self.sentiment *= 0.5;
        Some(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(v: f64) -> ComponentScores {
        ComponentScores {
            technical: v,
            sentiment: v,
            global_markets: v,
            volume: v,
            fundamentals: v,
            intraday: v,
        }
    }

    #[test]
    fn test_composite_is_weighted_sum() {
        let weights = ComponentWeights::default();
        assert_relative_eq!(uniform(1.0).composite(&weights), 1.0, epsilon = 1e-12);
        assert_relative_eq!(uniform(-1.0).composite(&weights), -1.0, epsilon = 1e-12);

        let scores = ComponentScores {
            technical: 0.8,
            sentiment: -0.4,
            ..Default::default()
        };
        assert_relative_eq!(scores.composite(&weights), 0.8 * 0.25 - 0.4 * 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_contributions_sum_to_composite() {
        let weights = ComponentWeights::default();
        let scores = ComponentScores {
            technical: 0.3,
            sentiment: 0.6,
            global_markets: -0.2,
            volume: 0.1,
            fundamentals: -0.5,
            intraday: 0.9,
        };
        let c = scores.contributions(&weights);
        let total = c.technical + c.sentiment + c.global_markets + c.volume + c.fundamentals + c.intraday;
        assert_relative_eq!(total, scores.composite(&weights), epsilon = 1e-12);
        assert_relative_eq!(c.sentiment, 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_sentiment_damping() {
        let mut scores = ComponentScores {
            sentiment: 0.6,
            ..Default::default()
        };
        assert_eq!(scores.dampen_contradicted_sentiment(-1.0), None);
        assert_eq!(scores.dampen_contradicted_sentiment(-2.5), Some(0.6));
        assert_relative_eq!(scores.sentiment, 0.3);

        let mut bearish = ComponentScores {
            sentiment: -0.5,
            ..Default::default()
        };
        assert_eq!(bearish.dampen_contradicted_sentiment(-3.0), None);
        assert_eq!(bearish.dampen_contradicted_sentiment(3.0), Some(-0.5));
        assert_relative_eq!(bearish.sentiment, -0.25);
    }

    #[test]
    fn test_empty_record_scores_neutral() {
        let scores = ComponentScores::from_features(&FeatureRecord::new(), &KeywordTables::new());
        assert_eq!(scores, ComponentScores::default());
    }
}
