use analysis_core::{squash, FeatureRecord, ScoreAccumulator};

/// RSI contribution. Oversold readings are bullish, overbought bearish;
/// the middle band carries only a slight mean-reversion bias.
pub fn rsi_signal(rsi: f64) -> f64 {
    if rsi < 25.0 {
        0.9
    } else if rsi < 30.0 {
        0.8
    } else if rsi < 40.0 {
        0.4
    } else if rsi > 75.0 {
        -0.9
    } else if rsi > 70.0 {
        -0.8
    } else if rsi > 60.0 {
        -0.4
    } else {
        (50.0 - rsi) / 100.0 * 0.3
    }
}

/// MACD histogram tiers.
pub fn macd_signal(histogram: f64) -> f64 {
    if histogram > 1.0 {
        0.85
    } else if histogram > 0.3 {
        0.5
    } else if histogram > 0.0 {
        0.25
    } else if histogram < -1.0 {
        -0.85
    } else if histogram < -0.3 {
        -0.5
    } else {
        -0.25
    }
}

/// Contrarian adjustment when the histogram disagrees with the
/// MACD/signal-line delta.
fn macd_divergence(histogram: f64, signal_diff: f64) -> f64 {
    if signal_diff > 0.5 && histogram < 0.0 {
        0.3
    } else if signal_diff < -0.5 && histogram > 0.0 {
        -0.3
    } else {
        0.0
    }
}

/// Price vs short MA vs long MA ordering, plus the golden/death cross
/// setup when the very-long MA is known.
fn moving_average_signal(price: f64, sma_20: f64, sma_50: f64, sma_200: Option<f64>) -> f64 {
    let mut score = if price > sma_20 && sma_20 > sma_50 {
        0.7
    } else if price > sma_20 {
        0.4
    } else if price < sma_20 && sma_20 < sma_50 {
        -0.7
    } else if price < sma_20 {
        -0.4
    } else {
        0.0
    };

    if let Some(sma_200) = sma_200 {
        if sma_50 > sma_200 && sma_20 > sma_50 {
            score += 0.5;
        } else if sma_50 < sma_200 && sma_20 < sma_50 {
            score -= 0.5;
        }
    }

    score
}

/// Position within the bands (0 = lower, 1 = upper) and the squeeze bonus.
fn bollinger_signal(position: f64, width: f64) -> f64 {
    let mut score = if position < 0.15 {
        0.6
    } else if position < 0.3 {
        0.35
    } else if position > 0.85 {
        -0.6
    } else if position > 0.7 {
        -0.35
    } else {
        0.0
    };

    // Narrow bands: volatility compression ahead of a breakout. A missing
    // width reads as 0.
    if width < 0.1 {
        score += 0.2;
    }

    score
}

/// Bounce/failure outweighs plain proximity.
fn support_resistance_signal(features: &FeatureRecord) -> Option<f64> {
    let bounce = features.flag("bounce_from_support");
    let near_support = features.flag("near_support");
    let failed = features.flag("failed_resistance");
    let near_resistance = features.flag("near_resistance");

    if !(bounce || near_support || failed || near_resistance) {
        return None;
    }

    let mut score = 0.0;
    if bounce {
        score += 0.5;
    } else if near_support {
        score += 0.3;
    }
    if failed {
        score -= 0.5;
    } else if near_resistance {
        score -= 0.3;
    }
    Some(score)
}

/// Technical component score in [-1, 1].
///
/// Averages over the sub-signals that could actually be evaluated from the
/// record (RSI, MACD, MA structure, Bollinger position, 1d/5d momentum,
/// support/resistance).
pub fn technical_score(features: &FeatureRecord) -> f64 {
    let mut acc = ScoreAccumulator::new();

    if let Some(rsi) = features.number("rsi") {
        acc.push(rsi_signal(rsi));
    }

    if let Some(hist) = features.number("macd_histogram") {
        acc.push(macd_signal(hist));
        acc.nudge(macd_divergence(hist, features.number_or("macd_signal_diff", 0.0)));
    }

    if let (Some(price), Some(sma_20), Some(sma_50)) = (
        features.number("current_price"),
        features.number("sma_20"),
        features.number("sma_50"),
    ) {
        acc.push(moving_average_signal(price, sma_20, sma_50, features.number("sma_200")));
    }

    if let Some(position) = features.number("bollinger_position") {
        acc.push(bollinger_signal(position, features.number_or("bollinger_width", 0.0)));
    }

    let change_1d = features.number_or("price_change_1d", 0.0);
    if change_1d != 0.0 {
        let mut momentum = squash(change_1d, 3.0) * 0.5;
        if change_1d < -2.0 {
            momentum -= 0.3;
        }
        acc.push(momentum);
    }

    let change_5d = features.number_or("price_change_5d", 0.0);
    if change_5d != 0.0 {
        acc.push(squash(change_5d, 8.0) * 0.4);
    }

    if let Some(sr) = support_resistance_signal(features) {
        acc.push(sr);
    }

    acc.mean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_record_is_neutral() {
        assert_eq!(technical_score(&FeatureRecord::new()), 0.0);
    }

    #[test]
    fn test_rsi_contribution_is_monotonic() {
        let mut previous = f64::INFINITY;
        let mut rsi = 20.0;
        while rsi <= 90.0 {
            let current = rsi_signal(rsi);
            assert!(current <= previous, "rsi {rsi}: {current} > {previous}");
            previous = current;
            rsi += 0.5;
        }
        assert_relative_eq!(rsi_signal(20.0), 0.9);
        assert_relative_eq!(rsi_signal(90.0), -0.9);
    }

    #[test]
    fn test_oversold_uptrend_is_strongly_bullish() {
        let features = FeatureRecord::new()
            .with("current_price", 100.0)
            .with("rsi", 20.0)
            .with("macd_histogram", 1.2)
            .with("sma_20", 98.0)
            .with("sma_50", 95.0)
            .with("price_change_1d", 1.5);

        let expected = (0.9 + 0.85 + 0.7 + 0.5f64.tanh() * 0.5) / 4.0;
        assert_relative_eq!(technical_score(&features), expected, epsilon = 1e-12);
        assert!(technical_score(&features) > 0.5);
    }

    #[test]
    fn test_missing_optional_inputs_do_not_dilute() {
        let only_rsi = FeatureRecord::new().with("rsi", 22.0);
        assert_relative_eq!(technical_score(&only_rsi), 0.9);
    }

    #[test]
    fn test_macd_divergence_is_contrarian() {
        let features = FeatureRecord::new()
            .with("macd_histogram", -0.2)
            .with("macd_signal_diff", 0.8);
        assert_relative_eq!(technical_score(&features), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_death_cross_alignment() {
        let features = FeatureRecord::new()
            .with("current_price", 90.0)
            .with("sma_20", 95.0)
            .with("sma_50", 100.0)
            .with("sma_200", 110.0);
        assert_eq!(technical_score(&features), -1.0);
    }

    #[test]
    fn test_squeeze_bonus_and_width_default() {
        let mid_band = FeatureRecord::new().with("bollinger_position", 0.5);
        assert_relative_eq!(technical_score(&mid_band), 0.2);

        let narrow = mid_band.clone().with("bollinger_width", 0.05);
        assert_relative_eq!(technical_score(&narrow), 0.2);

        let wide = mid_band.with("bollinger_width", 0.3);
        assert_eq!(technical_score(&wide), 0.0);
    }

    #[test]
    fn test_large_drop_adds_penalty() {
        let features = FeatureRecord::new().with("price_change_1d", -3.0);
        assert_relative_eq!(
            technical_score(&features),
            -(1f64.tanh()) * 0.5 - 0.3,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bounce_outweighs_proximity() {
        let bounce = FeatureRecord::new().with("bounce_from_support", true);
        let near = FeatureRecord::new().with("near_support", true);
        assert!(technical_score(&bounce) > technical_score(&near));

        let failed = FeatureRecord::new().with("failed_resistance", true);
        assert_relative_eq!(technical_score(&failed), -0.5);
    }

    #[test]
    fn test_score_is_bounded() {
        let features = FeatureRecord::new()
            .with("current_price", 200.0)
            .with("rsi", 10.0)
            .with("macd_histogram", -5.0)
            .with("macd_signal_diff", 3.0)
            .with("sma_20", 150.0)
            .with("sma_50", 120.0)
            .with("sma_200", 100.0)
            .with("bollinger_position", 0.0)
            .with("bollinger_width", 0.01)
            .with("price_change_1d", 40.0)
            .with("price_change_5d", 90.0)
            .with("bounce_from_support", true);
        let score = technical_score(&features);
        assert!((-1.0..=1.0).contains(&score));
    }
}
