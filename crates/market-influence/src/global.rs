use analysis_core::{clamp_unit, FeatureRecord, MarketSentiment};

/// Moves smaller than this (percent) are ignored when no label is given.
const CHANGE_NOISE_FLOOR: f64 = 0.5;

/// One market's term: an explicit sentiment label wins over the raw change.
fn market_term(sentiment: MarketSentiment, change: f64, label_weight: f64, change_weight: f64) -> f64 {
    match sentiment {
        MarketSentiment::Positive => label_weight,
        MarketSentiment::Negative => -label_weight,
        MarketSentiment::Neutral if change.abs() > CHANGE_NOISE_FLOOR => change.tanh() * change_weight,
        MarketSentiment::Neutral => 0.0,
    }
}

/// Global-markets component score in [-1, 1].
///
/// Asian session carries the dominant share, Europe about a third of it and
/// US futures a similar small term. All three are always evaluated, so the
/// terms are summed rather than averaged.
pub fn global_market_score(features: &FeatureRecord) -> f64 {
    let mut score = market_term(
        features.sentiment("asian_market_sentiment"),
        features.number_or("asian_market_change", 0.0),
        0.65,
        0.6,
    );

    let asian_strength = features.number_or("asian_market_strength", 0.0);
    if asian_strength > 0.0 {
        score += asian_strength * 0.2;
    }

    score += market_term(
        features.sentiment("european_market_sentiment"),
        features.number_or("european_market_change", 0.0),
        0.2,
        0.15,
    );

    score += market_term(
        features.sentiment("futures_sentiment"),
        features.number_or("futures_change", 0.0),
        0.2,
        0.15,
    );

    clamp_unit(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quiet_markets() {
        assert_eq!(global_market_score(&FeatureRecord::new()), 0.0);
        let small_moves = FeatureRecord::new()
            .with("asian_market_change", 0.4)
            .with("european_market_change", -0.3);
        assert_eq!(global_market_score(&small_moves), 0.0);
    }

    #[test]
    fn test_labels_outweigh_raw_change() {
        let labelled = FeatureRecord::new().with("asian_market_sentiment", "positive");
        let raw = FeatureRecord::new().with("asian_market_change", 1.0);
        assert_relative_eq!(global_market_score(&labelled), 0.65);
        assert_relative_eq!(global_market_score(&raw), 1f64.tanh() * 0.6);
        assert!(global_market_score(&labelled) > global_market_score(&raw));
    }

    #[test]
    fn test_all_regions_bearish() {
        let features = FeatureRecord::new()
            .with("asian_market_sentiment", "negative")
            .with("european_market_sentiment", "negative")
            .with("futures_sentiment", "negative");
        assert_relative_eq!(global_market_score(&features), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_is_clamped() {
        let features = FeatureRecord::new()
            .with("asian_market_sentiment", "positive")
            .with("asian_market_strength", 1.0)
            .with("european_market_sentiment", "positive")
            .with("futures_sentiment", "positive");
        assert_eq!(global_market_score(&features), 1.0);
    }
}
