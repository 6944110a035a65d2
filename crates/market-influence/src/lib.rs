//! Market Influence Module
//!
//! Cross-market scoring: the global-markets component that feeds the
//! composite, and the per-region attribution (Asian, European, local US)
//! that explains how much of the projected move each region accounts for.

pub mod global;
pub mod local;
pub mod regions;

pub use global::global_market_score;
pub use local::{local_impact_percent, local_influence, LocalFactors, LocalInfluence};
pub use regions::{asian_influence, european_influence, RegionInfluence};
