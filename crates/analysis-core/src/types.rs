use serde::{Deserialize, Serialize};

/// The six scored components feeding the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Technical,
    Sentiment,
    GlobalMarkets,
    Volume,
    Fundamentals,
    Intraday,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Technical,
        Component::Sentiment,
        Component::GlobalMarkets,
        Component::Volume,
        Component::Fundamentals,
        Component::Intraday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Technical => "technical",
            Component::Sentiment => "sentiment",
            Component::GlobalMarkets => "global_markets",
            Component::Volume => "volume",
            Component::Fundamentals => "fundamentals",
            Component::Intraday => "intraday",
        }
    }
}

/// Predicted direction. There is deliberately no neutral variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn from_bullish_probability(p: f64) -> Self {
        if p > 0.5 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Direction::Up)
    }

    /// +1 for up, -1 for down.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Direction::Up => "BULLISH",
            Direction::Down => "BEARISH",
        }
    }
}

/// Discrete alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Warning,
    Opportunity,
    Alert,
}

/// Alert strength label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStrength {
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "STRONG")]
    Strong,
    #[serde(rename = "VERY STRONG")]
    VeryStrong,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "CRITICAL")]
    Critical,
}

/// A discrete trading alert with its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub strength: AlertStrength,
    pub reason: String,
}

impl Signal {
    pub fn new(kind: SignalKind, strength: AlertStrength, reason: impl Into<String>) -> Self {
        Self {
            kind,
            strength,
            reason: reason.into(),
        }
    }
}
