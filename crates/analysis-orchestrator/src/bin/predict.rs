//! predict: score one feature record and print the JSON response.
//!
//! Usage:
//!   predict --features '{"current_price": 101.3, "rsi": 28}'
//!   cat features.json | predict
//!
//! Exits 0 on success and 1 when the engine reports a failure.

use analysis_core::FeatureRecord;
use analysis_orchestrator::{EngineConfig, EnsembleEngine};
use anyhow::{Context, Result};
use std::io::Read;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "analysis_orchestrator=info".into());

    // stdout carries the response, logs go to stderr.
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_input(args: &[String]) -> Result<String> {
    if let Some(pos) = args.iter().position(|a| a == "--features") {
        return args
            .get(pos + 1)
            .cloned()
            .context("--features requires a JSON argument");
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read features from stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    // Loads .env first so RUST_LOG and RUST_LOG_FORMAT apply to logging.
    let config = EngineConfig::from_env()?;
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let engine = EnsembleEngine::new(config)?;

    let raw = read_input(&args)?;
    let value: serde_json::Value =
        serde_json::from_str(raw.trim()).context("features must be a JSON object")?;
    let features = FeatureRecord::from_json(&value).context("features must be a JSON object")?;
    tracing::debug!("Loaded {} features", features.len());

    let response = engine.predict(&features);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
