use analysis_core::{AlertStrength, Direction, FeatureRecord, MarketSentiment, Signal, SignalKind};

pub const MAX_SIGNALS: usize = 5;
pub const MAX_REASONS: usize = 3;

/// What the signal table reads besides the raw features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalContext {
    pub direction: Direction,
    pub confidence: f64,
    pub technical: f64,
    pub sentiment: f64,
}

/// RSI as the rule tables read it: a missing or zero reading is ignored.
fn rsi_reading(features: &FeatureRecord) -> Option<f64> {
    features.number("rsi").filter(|rsi| *rsi != 0.0)
}

fn consensus_signal(ctx: &SignalContext) -> Option<Signal> {
    let bullish = ctx.direction.is_bullish();
    let aligned = if bullish {
        ctx.technical > 0.6 && ctx.sentiment > 0.4
    } else {
        ctx.technical < -0.6 && ctx.sentiment < -0.4
    };
    let (kind, side) = if bullish {
        (SignalKind::Buy, "Bullish")
    } else {
        (SignalKind::Sell, "Bearish")
    };

    if ctx.confidence > 0.80 && aligned {
        let mood = if bullish { "positive" } else { "negative" };
        Some(Signal::new(
            kind,
            AlertStrength::VeryStrong,
            format!("Excellent alignment: {} technicals + {} sentiment", side, mood),
        ))
    } else if ctx.confidence > 0.70 {
        Some(Signal::new(
            kind,
            AlertStrength::Strong,
            format!("High confidence {} prediction", side.to_lowercase()),
        ))
    } else if ctx.confidence > 0.60 {
        Some(Signal::new(
            kind,
            AlertStrength::Moderate,
            format!("{} momentum detected", side),
        ))
    } else {
        None
    }
}

/// Discrete alerts in priority order: consensus, RSI extremes, volume
/// extremes, then news sentiment. At most [`MAX_SIGNALS`].
pub fn generate_signals(ctx: &SignalContext, features: &FeatureRecord) -> Vec<Signal> {
    let mut signals = Vec::new();

    if let Some(signal) = consensus_signal(ctx) {
        signals.push(signal);
    }

    if let Some(rsi) = rsi_reading(features) {
        if rsi > 80.0 {
            signals.push(Signal::new(
                SignalKind::Warning,
                AlertStrength::Critical,
                format!("Extreme overbought (RSI: {:.1}) - Strong correction risk", rsi),
            ));
        } else if rsi > 75.0 {
            signals.push(Signal::new(
                SignalKind::Warning,
                AlertStrength::High,
                format!("Overbought (RSI: {:.1}) - Correction possible", rsi),
            ));
        }

        if rsi < 20.0 {
            signals.push(Signal::new(
                SignalKind::Opportunity,
                AlertStrength::Critical,
                format!("Extreme oversold (RSI: {:.1}) - Major bounce opportunity", rsi),
            ));
        } else if rsi < 25.0 {
            signals.push(Signal::new(
                SignalKind::Opportunity,
                AlertStrength::High,
                format!("Oversold (RSI: {:.1}) - Potential bounce", rsi),
            ));
        }
    }

    let volume_ratio = features.number_or("volume_ratio", 1.0);
    if volume_ratio > 2.5 {
        signals.push(Signal::new(
            SignalKind::Alert,
            AlertStrength::Critical,
            format!("Exceptional volume spike ({:.1}x) - Major activity", volume_ratio),
        ));
    } else if volume_ratio > 1.8 {
        signals.push(Signal::new(
            SignalKind::Alert,
            AlertStrength::High,
            format!("High volume ({:.1}x) - Increased conviction", volume_ratio),
        ));
    }

    let news_count = features.number_or("news_count", 0.0);
    if ctx.sentiment > 0.7 && news_count > 5.0 {
        signals.push(Signal::new(
            SignalKind::Buy,
            AlertStrength::Strong,
            "Very positive news sentiment across multiple sources",
        ));
    } else if ctx.sentiment < -0.7 && news_count > 5.0 {
        signals.push(Signal::new(
            SignalKind::Sell,
            AlertStrength::Strong,
            "Very negative news sentiment across multiple sources",
        ));
    }

    signals.truncate(MAX_SIGNALS);
    signals
}

/// Ranked rationale, one line per evidence family (technical, sentiment,
/// Asian and European markets, volume, RSI). At most [`MAX_REASONS`].
pub fn top_reasons(features: &FeatureRecord, technical: f64, sentiment: f64) -> Vec<String> {
    let mut reasons: Vec<&str> = Vec::new();

    if technical > 0.7 {
        reasons.push("Strong bullish technical indicators");
    } else if technical > 0.4 {
        reasons.push("Moderately bullish technical setup");
    } else if technical < -0.7 {
        reasons.push("Strong bearish technical indicators");
    } else if technical < -0.4 {
        reasons.push("Moderately bearish technical setup");
    }

    let news_count = features.number_or("news_count", 0.0);
    if sentiment > 0.6 && news_count > 3.0 {
        reasons.push("Positive news sentiment and strong buying interest");
    } else if sentiment > 0.3 {
        reasons.push("Slight bullish sentiment shift");
    } else if sentiment < -0.6 && news_count > 3.0 {
        reasons.push("Negative news sentiment and selling pressure");
    } else if sentiment < -0.3 {
        reasons.push("Slight bearish sentiment shift");
    }

    match features.sentiment("asian_market_sentiment") {
        MarketSentiment::Positive => reasons.push("Asian markets showing strength"),
        MarketSentiment::Negative => reasons.push("Asian market weakness affecting US"),
        MarketSentiment::Neutral => {}
    }

    match features.sentiment("european_market_sentiment") {
        MarketSentiment::Positive => reasons.push("European markets showing strength"),
        MarketSentiment::Negative => reasons.push("European market weakness affecting US"),
        MarketSentiment::Neutral => {}
    }

    if features.number_or("volume_ratio", 1.0) > 1.5 {
        reasons.push("Volume supporting price direction");
    }

    if let Some(rsi) = rsi_reading(features) {
        if rsi < 30.0 {
            reasons.push("Oversold conditions present");
        } else if rsi > 70.0 {
            reasons.push("Overbought conditions present");
        }
    }

    reasons.into_iter().take(MAX_REASONS).map(String::from).collect()
}
