use analysis_core::{squash, FeatureRecord, ScoreAccumulator};

/// Intraday component score in [-1, 1].
///
/// The change term is always counted: a flat session still contributes
/// through session activity, so thin records are not silently dropped.
pub fn intraday_score(features: &FeatureRecord) -> f64 {
    let mut acc = ScoreAccumulator::new();

    let change = features.number_or("intraday_change_percent", 0.0);
    let volume_ratio = features.number_or("intraday_volume_ratio", 1.0);

    if change.abs() > 0.1 {
        acc.push(squash(change, 5.0) * 0.5);
    } else if volume_ratio > 1.0 {
        acc.push((volume_ratio - 1.0) * 0.1);
    } else {
        acc.push(0.0);
    }

    if volume_ratio > 1.5 {
        acc.push(((volume_ratio - 1.0) * 2.0).tanh() * 0.3);
    } else if volume_ratio > 1.1 {
        acc.push((volume_ratio - 1.0) * 0.2);
    }

    let gap = features.number_or("open_close_gap_percent", 0.0);
    if gap.abs() > 0.1 {
        acc.push(squash(gap, 3.0) * 0.4);
    }

    acc.mean()
}
