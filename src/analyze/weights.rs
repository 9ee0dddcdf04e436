//! Fixed component weights.
//!
//! The overall score weighs all four components; the timeframe view has no
//! historical options series and re-weights the remaining three.

use serde::{Deserialize, Serialize};

/// The closed set of sentiment components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    FearGreed,
    Market,
    Volatility,
    Options,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::FearGreed,
        Component::Market,
        Component::Volatility,
        Component::Options,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub fear_greed: f64,
    pub market: f64,
    pub volatility: f64,
    pub options: f64,
}

/// Current-day composite.
pub const OVERALL_WEIGHTS: Weights = Weights {
    fear_greed: 0.35,
    market: 0.25,
    volatility: 0.20,
    options: 0.20,
};

/// Historical windows (1d/5d/1m); options omitted.
pub const TIMEFRAME_WEIGHTS: Weights = Weights {
    fear_greed: 0.4,
    market: 0.4,
    volatility: 0.2,
    options: 0.0,
};

impl Weights {
    pub fn weight(&self, c: Component) -> f64 {
        match c {
            Component::FearGreed => self.fear_greed,
            Component::Market => self.market,
            Component::Volatility => self.volatility,
            Component::Options => self.options,
        }
    }

    pub fn sum(&self) -> f64 {
        Component::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

impl Default for Weights {
    fn default() -> Self {
        OVERALL_WEIGHTS
    }
}
