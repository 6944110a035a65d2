use analysis_core::FeatureRecord;
use serde::{Deserialize, Serialize};

/// Direction an anticipated correction would move price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CorrectionDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CorrectionSeverity {
    Low,
    Moderate,
    High,
}

impl CorrectionSeverity {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s > 60.0 => CorrectionSeverity::High,
            s if s > 30.0 => CorrectionSeverity::Moderate,
            _ => CorrectionSeverity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionPattern {
    OverboughtRsi,
    OversoldRsi,
    ParabolicRise,
    ExtendedDecline,
    UpperBandBreakout,
    LowerBandBreakdown,
    VolumeExhaustion,
}

impl CorrectionPattern {
    pub fn direction(&self) -> CorrectionDirection {
        match self {
            CorrectionPattern::OverboughtRsi
            | CorrectionPattern::ParabolicRise
            | CorrectionPattern::UpperBandBreakout
            | CorrectionPattern::VolumeExhaustion => CorrectionDirection::Down,
            CorrectionPattern::OversoldRsi
            | CorrectionPattern::ExtendedDecline
            | CorrectionPattern::LowerBandBreakdown => CorrectionDirection::Up,
        }
    }
}

/// Correction-risk assessment, computed fresh for every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionWarning {
    pub warning: bool,
    pub direction: CorrectionDirection,
    /// Accumulated pattern severity, 0-100.
    pub correction_score: f64,
    pub severity: CorrectionSeverity,
    pub patterns: Vec<String>,
}

struct PatternHit {
    pattern: CorrectionPattern,
    severity: f64,
    description: String,
}

fn detect_patterns(features: &FeatureRecord) -> Vec<PatternHit> {
    let rsi = features.number_or("rsi", 50.0);
    let change_1d = features.number_or("price_change_1d", 0.0);
    let change_3d = features.number_or("price_change_3d", 0.0);
    let change_7d = features.number_or("price_change_7d", 0.0);
    let band = features.number_or("bollinger_position", 0.5);
    let volume_spike = features.flag("volume_spike");

    let mut hits = Vec::new();
    let mut hit = |pattern, severity, description: String| {
        hits.push(PatternHit {
            pattern,
            severity,
            description,
        })
    };

    if rsi > 75.0 {
        hit(
            CorrectionPattern::OverboughtRsi,
            ((rsi - 70.0) * 10.0).min(40.0),
            format!("Overbought RSI: {:.1}", rsi),
        );
    }
    if rsi < 25.0 {
        hit(
            CorrectionPattern::OversoldRsi,
            ((30.0 - rsi) * 10.0).min(40.0),
            format!("Oversold RSI: {:.1}", rsi),
        );
    }
    if change_7d > 10.0 && change_3d > 5.0 && rsi > 70.0 {
        hit(
            CorrectionPattern::ParabolicRise,
            30.0,
            format!("Parabolic rise: +{:.1}% (7d)", change_7d),
        );
    }
    if change_7d < -10.0 && rsi < 35.0 {
        hit(
            CorrectionPattern::ExtendedDecline,
            25.0,
            format!("Extended decline: {:.1}% (7d)", change_7d),
        );
    }
    if band > 0.95 && rsi > 65.0 {
        hit(
            CorrectionPattern::UpperBandBreakout,
            20.0,
            "Upper band breakout + overbought".to_string(),
        );
    }
    if band < 0.05 && rsi < 40.0 {
        hit(
            CorrectionPattern::LowerBandBreakdown,
            20.0,
            "Lower band breakdown + oversold".to_string(),
        );
    }
    if volume_spike && rsi > 70.0 && change_1d > 3.0 {
        hit(
            CorrectionPattern::VolumeExhaustion,
            25.0,
            "Volume exhaustion at highs".to_string(),
        );
    }

    hits
}

/// Scan the record for reversal setups and summarise the correction risk.
pub fn correction_warning(features: &FeatureRecord) -> CorrectionWarning {
    let hits = detect_patterns(features);

    let (mut up, mut down) = (0.0, 0.0);
    for h in &hits {
        match h.pattern.direction() {
            CorrectionDirection::Up => up += h.severity,
            CorrectionDirection::Down => down += h.severity,
            CorrectionDirection::Neutral => {}
        }
    }

    let direction = if up > down {
        CorrectionDirection::Up
    } else if down > up {
        CorrectionDirection::Down
    } else {
        CorrectionDirection::Neutral
    };

    let correction_score = (up + down).min(100.0);

    CorrectionWarning {
        warning: !hits.is_empty(),
        direction,
        correction_score,
        severity: CorrectionSeverity::from_score(correction_score),
        patterns: hits.into_iter().map(|h| h.description).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_record_has_no_warning() {
        let warning = correction_warning(&FeatureRecord::new());
        assert!(!warning.warning);
        assert_eq!(warning.direction, CorrectionDirection::Neutral);
        assert_eq!(warning.correction_score, 0.0);
        assert_eq!(warning.severity, CorrectionSeverity::Low);
        assert!(warning.patterns.is_empty());
    }

    #[test]
    fn test_blow_off_top() {
        let features = FeatureRecord::new()
            .with("rsi", 82.0)
            .with("price_change_1d", 4.0)
            .with("price_change_3d", 7.0)
            .with("price_change_7d", 14.0)
            .with("bollinger_position", 0.98)
            .with("volume_spike", true);

        let warning = correction_warning(&features);
        assert!(warning.warning);
        assert_eq!(warning.direction, CorrectionDirection::Down);
        // 40 + 30 + 20 + 25, capped
        assert_eq!(warning.correction_score, 100.0);
        assert_eq!(warning.severity, CorrectionSeverity::High);
        assert_eq!(warning.patterns.len(), 4);
    }

    #[test]
    fn test_capitulation_points_up() {
        let features = FeatureRecord::new()
            .with("rsi", 27.0)
            .with("price_change_7d", -12.0)
            .with("bollinger_position", 0.02);

        let warning = correction_warning(&features);
        assert_eq!(warning.direction, CorrectionDirection::Up);
        assert_eq!(warning.correction_score, 45.0);
        assert_eq!(warning.severity, CorrectionSeverity::Moderate);
    }

    #[test]
    fn test_wire_format() {
        let warning = correction_warning(&FeatureRecord::new().with("rsi", 20.0));
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["direction"], "UP");
        assert_eq!(value["severity"], "MODERATE");
        assert_eq!(value["correction_score"], 40.0);
    }
}
