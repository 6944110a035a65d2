//! Sparse feature record consumed by every scorer.
//!
//! A record maps feature names to loosely typed values. Lookups never fail:
//! a missing key, or a value that cannot be coerced to the requested shape,
//! reads as absent and the caller falls back to its documented default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single observed feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays, objects and anything else the feature supplier should not send.
    Other(serde_json::Value),
}

impl FeatureValue {
    /// Numeric view of the value. Non-finite numbers read as absent.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FeatureValue::Number(n) => *n,
            FeatureValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FeatureValue::Null | FeatureValue::Other(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_flag(&self) -> bool {
        match self {
            FeatureValue::Bool(b) => *b,
            FeatureValue::Number(n) => n.is_finite() && *n != 0.0,
            FeatureValue::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes") || s == "1"
            }
            FeatureValue::Null | FeatureValue::Other(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Number(v as f64)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

/// Categorical market mood label ("positive" / "negative" / anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSentiment {
    Positive,
    Negative,
    Neutral,
}

impl MarketSentiment {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("positive") {
            MarketSentiment::Positive
        } else if label.eq_ignore_ascii_case("negative") {
            MarketSentiment::Negative
        } else {
            MarketSentiment::Neutral
        }
    }
}

/// Feature record for one prediction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling records in code and tests.
    pub fn with(mut self, key: &str, value: impl Into<FeatureValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FeatureValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.number(key).is_some()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FeatureValue::as_number)
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(FeatureValue::as_flag)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FeatureValue::as_text)
    }

    /// True when the text value equals `expected`, ignoring ASCII case.
    pub fn text_is(&self, key: &str, expected: &str) -> bool {
        self.text(key)
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(expected))
    }

    pub fn sentiment(&self, key: &str) -> MarketSentiment {
        self.text(key)
            .map(MarketSentiment::parse)
            .unwrap_or(MarketSentiment::Neutral)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
