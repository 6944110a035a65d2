use analysis_core::{clamp_unit, squash, FeatureRecord};

/// Volume component score in [-1, 1].
///
/// The volume ratio picks the magnitude band and the same-day price change
/// picks the sign. Heavy selling is floored: a decline of 2% or more never
/// scores above -0.5, and 1.5% or more never above -0.3, whatever the
/// volume says.
pub fn volume_score(features: &FeatureRecord) -> f64 {
    let ratio = features.number_or("volume_ratio", 1.0);
    let change = features.number_or("price_change_1d", 0.0);

    let mut score = if ratio > 2.0 {
        if change > 1.0 {
            0.8
        } else if change < -1.0 {
            -0.8
        } else {
            0.4
        }
    } else if ratio > 1.5 {
        if change > 1.0 {
            0.6
        } else if change < -1.0 {
            -0.6
        } else {
            0.3
        }
    } else if ratio > 1.0 {
        squash(change, 2.0) * 0.4
    } else if ratio > 0.8 {
        squash(change, 2.0) * 0.3
    } else {
        squash(change, 3.0) * 0.2
    };

    if features.text_is("volume_trend", "up") {
        score += 0.1;
    } else if features.text_is("volume_trend", "down") {
        score -= 0.05;
    }

    // The floor goes last so nothing above can lift a selloff reading.
    if change <= -2.0 {
        score = score.min(-0.5);
    } else if change <= -1.5 {
        score = score.min(-0.3);
    }

    clamp_unit(score)
}
