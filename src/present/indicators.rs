//! Per-indicator display data (`indicators` in the analysis artifact):
//! rounded values, one-line messages and card colors.

use serde::{Deserialize, Serialize};

use crate::model::{MarketSnapshot, Symbol};

pub const GREEN: &str = "#10b981";
pub const AMBER: &str = "#f59e0b";
pub const GRAY: &str = "#6b7280";
pub const ORANGE: &str = "#f97316";
pub const RED: &str = "#ef4444";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedCard {
    pub value: u8,
    pub label: String,
    pub message: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCard {
    pub price: f64,
    pub change: f64,
    pub message: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VixCard {
    pub value: f64,
    pub message: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsCard {
    pub spy: String,
    pub qqq: String,
    pub iwm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub fear_greed: FearGreedCard,
    pub spy: MarketCard,
    pub qqq: MarketCard,
    pub iwm: MarketCard,
    pub vix: VixCard,
    pub options: OptionsCard,
}

/// Fear & greed buckets shared by rating, message and color.
fn fear_greed_bucket(value: f64) -> usize {
    match value {
        v if v >= 75.0 => 0,
        v if v >= 55.0 => 1,
        v if v >= 45.0 => 2,
        v if v >= 25.0 => 3,
        _ => 4,
    }
}

/// Rating used when the provider did not send one.
pub fn fear_greed_rating(value: f64) -> &'static str {
    ["Extreme Greed", "Greed", "Neutral", "Fear", "Extreme Fear"][fear_greed_bucket(value)]
}

pub fn fear_greed_message(value: f64) -> &'static str {
    [
        "Extreme greed in markets",
        "Markets showing greed",
        "Market sentiment balanced",
        "Fear dominates markets",
        "Extreme fear in markets",
    ][fear_greed_bucket(value)]
}

pub fn fear_greed_color(value: f64) -> &'static str {
    [GREEN, AMBER, GRAY, ORANGE, RED][fear_greed_bucket(value)]
}

pub fn market_message(index: &str, change_pct: f64) -> String {
    let verb = match change_pct {
        c if c >= 2.0 => "rallying strongly",
        c if c >= 0.5 => "trending higher",
        c if c >= -0.5 => "trading flat",
        c if c >= -2.0 => "under pressure",
        _ => "declining sharply",
    };
    format!("{index} {verb}")
}

pub fn change_color(change_pct: f64) -> &'static str {
    if change_pct >= 0.0 {
        GREEN
    } else {
        RED
    }
}

pub fn vix_message(vix: f64) -> &'static str {
    match vix {
        v if v >= 30.0 => "Market fear is elevated",
        v if v >= 20.0 => "Volatility is moderate",
        v if v >= 15.0 => "Markets are calm",
        _ => "Complacency in markets",
    }
}

pub fn vix_color(vix: f64) -> &'static str {
    match vix {
        v if v >= 25.0 => RED,
        v if v >= 18.0 => AMBER,
        _ => GREEN,
    }
}

/// `None` (or an unusable ratio) reads as unavailable.
pub fn options_message(ticker: &str, ratio: Option<f64>) -> String {
    let Some(r) = ratio else {
        return format!("{ticker} options data unavailable");
    };
    let mood = match r {
        r if r >= 1.5 => "very bearish",
        r if r >= 1.1 => "bearish",
        r if r >= 0.9 => "neutral",
        r if r >= 0.7 => "bullish",
        _ => "very bullish",
    };
    format!("{ticker} traders {mood}")
}

fn market_card(snapshot: &MarketSnapshot, symbol: Symbol) -> MarketCard {
    let series = snapshot.equity(symbol);
    let change = series.change_percent();
    MarketCard {
        price: series.latest(),
        change,
        message: market_message(symbol.index_name(), change),
        color: change_color(change).to_string(),
    }
}

fn options_line(snapshot: &MarketSnapshot, symbol: Symbol) -> String {
    let ratio = snapshot.options.get(symbol).and_then(|o| o.usable_ratio());
    options_message(symbol.ticker(), ratio)
}

impl Indicators {
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        let fg = &snapshot.fear_greed.current;
        let vix = snapshot.vix.latest();
        Self {
            fear_greed: FearGreedCard {
                value: crate::analyze::normalize::round_score(fg.value),
                label: fg
                    .rating
                    .clone()
                    .unwrap_or_else(|| fear_greed_rating(fg.value).to_string()),
                message: fear_greed_message(fg.value).to_string(),
                color: fear_greed_color(fg.value).to_string(),
            },
            spy: market_card(snapshot, Symbol::Spy),
            qqq: market_card(snapshot, Symbol::Qqq),
            iwm: market_card(snapshot, Symbol::Iwm),
            vix: VixCard {
                value: (vix * 10.0).round() / 10.0,
                message: vix_message(vix).to_string(),
                color: vix_color(vix).to_string(),
            },
            options: OptionsCard {
                spy: options_line(snapshot, Symbol::Spy),
                qqq: options_line(snapshot, Symbol::Qqq),
                iwm: options_line(snapshot, Symbol::Iwm),
            },
        }
    }

    /// Defaults shown when no analysis artifact is available.
    pub fn neutral() -> Self {
        let flat = |symbol: Symbol, price: f64| MarketCard {
            price,
            change: 0.0,
            message: market_message(symbol.index_name(), 0.0),
            color: GRAY.to_string(),
        };
        Self {
            fear_greed: FearGreedCard {
                value: 50,
                label: "Neutral".to_string(),
                message: fear_greed_message(50.0).to_string(),
                color: GRAY.to_string(),
            },
            spy: flat(Symbol::Spy, 450.0),
            qqq: flat(Symbol::Qqq, 400.0),
            iwm: flat(Symbol::Iwm, 230.0),
            vix: VixCard {
                value: 20.0,
                message: vix_message(20.0).to_string(),
                color: AMBER.to_string(),
            },
            options: OptionsCard {
                spy: options_message("SPY", None),
                qqq: options_message("QQQ", None),
                iwm: options_message("IWM", None),
            },
        }
    }
}
