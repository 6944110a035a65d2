use analysis_core::{squash, FeatureRecord, ScoreAccumulator};

/// Growth figures below this magnitude (in percent) are treated as noise.
const GROWTH_NOISE_FLOOR: f64 = 0.5;

fn growth_term(features: &FeatureRecord, key: &str, scale: f64, weight: f64) -> Option<f64> {
    let growth = features.number_or(key, 0.0);
    (growth.abs() > GROWTH_NOISE_FLOOR).then(|| squash(growth, scale) * weight)
}

/// Fundamentals component score in [-1, 1].
///
/// Valuation is always counted: a PE percentile at its 50th-percentile
/// default contributes zero but still takes a slot in the average.
pub fn fundamental_score(features: &FeatureRecord) -> f64 {
    let mut acc = ScoreAccumulator::new();

    if let Some(term) = growth_term(features, "revenue_growth", 25.0, 0.7) {
        acc.push(term);
    }
    // Earnings growth carries the most weight of the growth figures.
    if let Some(term) = growth_term(features, "earnings_growth", 30.0, 0.8) {
        acc.push(term);
    }
    if let Some(term) = growth_term(features, "margin_change_percent", 20.0, 0.5) {
        acc.push(term);
    }

    if features.text_is("analyst_action", "upgrade") {
        acc.push(0.6);
    } else if features.text_is("analyst_action", "downgrade") {
        acc.push(-0.6);
    }

    if features.text_is("insider_activity", "buying") {
        acc.push(0.5);
    } else if features.text_is("insider_activity", "selling") {
        acc.push(-0.5);
    }

    let pe_percentile = features.number_or("pe_percentile", 50.0);
    acc.push((pe_percentile - 50.0) / 50.0 * 0.5);

    acc.mean()
}
