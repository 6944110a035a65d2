use analysis_core::{squash, FeatureRecord, ScoreAccumulator};

pub mod keywords;
pub use keywords::{KeywordTables, KeywordTally};

/// Article count at which the base news sentiment gets full weight.
const NEWS_SATURATION: f64 = 15.0;
/// Social post volume at which social sentiment gets full weight.
const SOCIAL_SATURATION: f64 = 1000.0;

/// Keyword evidence for the record: the supplier's pre-aggregated totals
/// when present, otherwise a tally of `news_keywords` against the tables.
pub fn keyword_tally(features: &FeatureRecord, tables: &KeywordTables) -> KeywordTally {
    let supplied = KeywordTally {
        bullish_count: features.number_or("bullish_keyword_count", 0.0).max(0.0),
        bearish_count: features.number_or("bearish_keyword_count", 0.0).max(0.0),
        bullish_total: features.number_or("bullish_keyword_score_total", 0.0),
        bearish_total: features.number_or("bearish_keyword_score_total", 0.0),
    };

    let has_totals = features.contains("bullish_keyword_score_total")
        || features.contains("bearish_keyword_score_total");
    if has_totals || !supplied.is_empty() {
        return supplied;
    }

    match features.text("news_keywords") {
        Some(csv) => tables.tally_csv(csv),
        None => supplied,
    }
}

/// Sentiment component score in [-1, 1].
///
/// Keyword evidence carries 0.7 against 0.5 for the averaged article
/// sentiment, so a clear keyword signal outweighs a lukewarm feed.
pub fn sentiment_score(features: &FeatureRecord, tables: &KeywordTables) -> f64 {
    let mut acc = ScoreAccumulator::new();

    let news_count = features.number_or("news_count", 0.0);
    if news_count > 0.0 {
        let weight = (news_count / NEWS_SATURATION).min(1.0);
        acc.push(features.number_or("news_sentiment_score", 0.0) * weight * 0.5);
    }

    let tally = keyword_tally(features, tables);
    if !tally.is_empty() {
        acc.push(squash(tally.net(), 10.0) * 0.7);

        if features.flag("has_high_impact_keywords") {
            let side = if tally.bullish_total >= tally.bearish_total {
                1.0
            } else {
                -1.0
            };
            acc.push(0.3 * side);
        }
    }

    let surprise = features.number_or("earnings_surprise_percent", 0.0);
    if surprise != 0.0 {
        acc.push(squash(surprise, 15.0) * 0.8);

        let guidance = features.number_or("guidance_change_percent", 0.0);
        if guidance != 0.0 {
            acc.push(squash(guidance, 10.0) * 0.6);
        }
    }

    if features.flag("has_surge_keywords") {
        let surge = features.number_or("surge_keyword_count", 0.0);
        acc.push((surge / 5.0).min(1.0) * 0.85);
    }

    if features.flag("has_bearish_keywords") {
        acc.push(-(tally.bearish_count / 5.0).min(1.0) * 0.85);
    }

    let social = features.number_or("social_sentiment", 0.0);
    if social != 0.0 {
        let weight = (features.number_or("social_volume", 0.0) / SOCIAL_SATURATION).min(1.0);
        acc.push(social * weight * 0.6);
    }

    let sector = features.number_or("sector_sentiment", 0.0);
    if sector != 0.0 {
        acc.push(sector * 0.3);
    }

    let upgrades = features.number_or("analyst_upgrades", 0.0);
    if upgrades > 0.0 {
        acc.push((upgrades / 3.0).min(1.0) * 0.5);
    }
    let downgrades = features.number_or("analyst_downgrades", 0.0);
    if downgrades > 0.0 {
        acc.push(-(downgrades / 3.0).min(1.0) * 0.5);
    }

    acc.mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_news_is_neutral() {
        let tables = KeywordTables::new();
        assert_eq!(sentiment_score(&FeatureRecord::new(), &tables), 0.0);
    }

    #[test]
    fn test_article_weight_saturates() {
        let tables = KeywordTables::new();
        let few = FeatureRecord::new()
            .with("news_sentiment_score", 0.8)
            .with("news_count", 3);
        let many = FeatureRecord::new()
            .with("news_sentiment_score", 0.8)
            .with("news_count", 40);
        assert_relative_eq!(sentiment_score(&few, &tables), 0.8 * 0.2 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(sentiment_score(&many, &tables), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_keywords_outweigh_base_sentiment() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("news_sentiment_score", -0.2)
            .with("news_count", 15)
            .with("bullish_keyword_count", 4)
            .with("bullish_keyword_score_total", 12.0)
            .with("bearish_keyword_count", 0)
            .with("bearish_keyword_score_total", 0.0)
            .with("has_high_impact_keywords", true);

        let expected = (-0.1 + 1.2f64.tanh() * 0.7 + 0.3) / 3.0;
        assert_relative_eq!(sentiment_score(&features, &tables), expected, epsilon = 1e-12);
        assert!(expected > 0.0);
    }

    #[test]
    fn test_keywords_derived_from_headline_phrases() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("news_keywords", "guidance cut, lawsuit, downgrade");
        let tally = keyword_tally(&features, &tables);
        assert_eq!(tally.bearish_count, 3.0);
        assert_relative_eq!(tally.bearish_total, 4.9, epsilon = 1e-12);
        assert!(sentiment_score(&features, &tables) < 0.0);
    }

    #[test]
    fn test_supplied_totals_take_precedence() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("bullish_keyword_score_total", 3.0)
            .with("bullish_keyword_count", 1)
            .with("news_keywords", "bankruptcy");
        let tally = keyword_tally(&features, &tables);
        assert_eq!(tally.bearish_count, 0.0);
        assert_relative_eq!(tally.net(), 3.0);
    }

    #[test]
    fn test_fractional_keyword_count_is_evidence() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("bullish_keyword_count", 0.5)
            .with("bullish_keyword_score_total", 1.0);
        assert_relative_eq!(
            sentiment_score(&features, &tables),
            0.1f64.tanh() * 0.7,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_earnings_and_guidance() {
        let tables = KeywordTables::new();
        let beat = FeatureRecord::new()
            .with("earnings_surprise_percent", 15.0)
            .with("guidance_change_percent", 10.0);
        let expected = (1f64.tanh() * 0.8 + 1f64.tanh() * 0.6) / 2.0;
        assert_relative_eq!(sentiment_score(&beat, &tables), expected, epsilon = 1e-12);

        // Guidance alone is ignored without an earnings surprise.
        let guidance_only = FeatureRecord::new().with("guidance_change_percent", 10.0);
        assert_eq!(sentiment_score(&guidance_only, &tables), 0.0);
    }

    #[test]
    fn test_analyst_activity_caps() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("analyst_upgrades", 9)
            .with("analyst_downgrades", 1);
        let expected = (0.5 - 0.5 / 3.0) / 2.0;
        assert_relative_eq!(sentiment_score(&features, &tables), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_bearish_flags() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("has_bearish_keywords", true)
            .with("bearish_keyword_count", 5)
            .with("bearish_keyword_score_total", 8.0);
        let expected = ((-0.8f64).tanh() * 0.7 - 0.85) / 2.0;
        assert_relative_eq!(sentiment_score(&features, &tables), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_social_weighted_by_volume() {
        let tables = KeywordTables::new();
        let features = FeatureRecord::new()
            .with("social_sentiment", 0.9)
            .with("social_volume", 500)
            .with("sector_sentiment", -0.5);
        let expected = (0.9 * 0.5 * 0.6 - 0.15) / 2.0;
        assert_relative_eq!(sentiment_score(&features, &tables), expected, epsilon = 1e-12);
    }
}
