//! Bullish/bearish news keyword tables.
//!
//! Built once per engine and shared read-only by reference with every
//! sentiment scoring call.

use serde::Serialize;

const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("earnings_beat", 2.0),
    ("beat_estimates", 2.0),
    ("strong_earnings", 1.8),
    ("revenue_growth", 1.6),
    ("guidance_raise", 1.8),
    ("product_launch", 1.5),
    ("merger", 1.4),
    ("acquisition", 1.4),
    ("partnership", 1.3),
    ("expansion", 1.4),
    ("record_revenue", 1.8),
    ("record_profit", 1.9),
    ("upgrade", 1.7),
    ("outperform", 1.6),
    ("breakthrough", 1.5),
    ("rally", 1.2),
];

// Magnitudes; the sign is implied by the table.
const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("earnings_miss", 2.0),
    ("miss_estimates", 2.0),
    ("weak_earnings", 1.8),
    ("revenue_decline", 1.6),
    ("guidance_cut", 1.8),
    ("layoffs", 1.7),
    ("recall", 1.5),
    ("lawsuit", 1.4),
    ("scandal", 1.6),
    ("downgrade", 1.7),
    ("underperform", 1.6),
    ("bankruptcy", 2.0),
    ("investigation", 1.5),
    ("loss", 1.4),
    ("decline", 1.2),
    ("warning", 1.3),
];

/// Keyword counts and weight totals for one batch of headlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KeywordTally {
    pub bullish_count: f64,
    pub bearish_count: f64,
    pub bullish_total: f64,
    /// Sum of bearish weight magnitudes (non-negative).
    pub bearish_total: f64,
}

impl KeywordTally {
    pub fn is_empty(&self) -> bool {
        !(self.bullish_count > 0.0 || self.bearish_count > 0.0)
    }

    pub fn net(&self) -> f64 {
        self.bullish_total - self.bearish_total
    }
}

#[derive(Debug, Clone)]
pub struct KeywordTables {
    bullish: Vec<(&'static str, f64)>,
    bearish: Vec<(&'static str, f64)>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTables {
    pub fn new() -> Self {
        Self {
            bullish: BULLISH_KEYWORDS.to_vec(),
            bearish: BEARISH_KEYWORDS.to_vec(),
        }
    }

    fn first_match(table: &[(&'static str, f64)], phrase: &str) -> Option<f64> {
        table
            .iter()
            .find(|(kw, _)| phrase.contains(kw))
            .map(|(_, w)| *w)
    }

    /// Tally phrases against both tables. A phrase can match one entry on
    /// each side ("earnings beat despite loss" counts once bullish and once
    /// bearish).
    pub fn tally<'a, I>(&self, phrases: I) -> KeywordTally
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = KeywordTally::default();
        for phrase in phrases {
            let normalized = phrase.trim().to_lowercase().replace([' ', '-'], "_");
            if normalized.is_empty() {
                continue;
            }
            if let Some(w) = Self::first_match(&self.bullish, &normalized) {
                tally.bullish_count += 1.0;
                tally.bullish_total += w;
            }
            if let Some(w) = Self::first_match(&self.bearish, &normalized) {
                tally.bearish_count += 1.0;
                tally.bearish_total += w;
            }
        }
        tally
    }

    /// Tally a comma-separated keyword list as supplied in a feature record.
    pub fn tally_csv(&self, csv: &str) -> KeywordTally {
        self.tally(csv.split(','))
    }
}
