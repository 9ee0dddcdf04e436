// src/analyze/mod.rs
//! Scoring pipeline: normalizers → composite → timeframe windows → confidence.
//! Everything here is pure and synchronous over an already-built snapshot.

pub mod confidence;
pub mod normalize;
pub mod scoring;
pub mod timeframe;
pub mod weights;

use crate::model::{MarketSnapshot, Symbol};

// Re-export convenient types.
pub use crate::analyze::scoring::{
    composite_score, Components, ScoreInputs, SentimentLabel, SubScore,
};
pub use crate::analyze::timeframe::{Timeframe, TimeframeReport, Timeframes, Trend};
pub use crate::analyze::weights::{Component, Weights, OVERALL_WEIGHTS, TIMEFRAME_WEIGHTS};

/// Current-day sub-scores for the four components.
pub fn current_inputs(snapshot: &MarketSnapshot) -> ScoreInputs {
    let changes: Vec<f64> = Symbol::ALL
        .iter()
        .map(|s| snapshot.equity(*s).change_percent())
        .collect();
    let ratios: Vec<Option<f64>> = Symbol::ALL
        .iter()
        .map(|s| snapshot.options.get(*s).and_then(|o| o.usable_ratio()))
        .collect();

    ScoreInputs::new(
        f64::from(normalize::fear_greed_score(snapshot.fear_greed.latest())),
        f64::from(normalize::market_score(&changes)),
        f64::from(normalize::volatility_score(snapshot.vix.latest())),
        f64::from(normalize::options_score(&ratios)),
    )
}
