// src/ingest/providers/yahoo.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{as_number, proxied, round2, Mode};
use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::types::SourceProvider;
use crate::model::{OptionsRatio, Symbol};

const NAME: &str = "yahoo_options";

/// Nearest-expiry option chain volumes for one symbol.
pub struct YahooOptionsProvider {
    symbol: Symbol,
    mode: Mode,
}

impl YahooOptionsProvider {
    pub fn new(symbol: Symbol, cfg: &AppConfig, client: &reqwest::Client) -> Self {
        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/options/{}",
            symbol.ticker()
        );
        Self {
            symbol,
            mode: Mode::http(proxied(cfg, &url), client, cfg),
        }
    }

    pub fn from_fixture(symbol: Symbol, doc: Value) -> Self {
        Self {
            symbol,
            mode: Mode::Fixture(doc),
        }
    }
}

fn total_volume(contracts: Option<&Value>) -> u64 {
    contracts
        .and_then(Value::as_array)
        .map(|cs| {
            cs.iter()
                .filter_map(|c| c.get("volume").and_then(as_number))
                .map(|v| v.max(0.0) as u64)
                .sum()
        })
        .unwrap_or(0)
}

/// Put volume over call volume, 1.0 when nothing traded on the call side.
pub fn parse_chain(
    symbol: Symbol,
    doc: &Value,
    now: DateTime<Utc>,
) -> Result<OptionsRatio, FetchError> {
    let chain = doc
        .pointer("/optionChain/result/0/options/0")
        .ok_or_else(|| FetchError::malformed(NAME, "missing optionChain.result[0].options[0]"))?;

    let calls = total_volume(chain.get("calls"));
    let puts = total_volume(chain.get("puts"));
    let ratio = if calls > 0 {
        round2(puts as f64 / calls as f64)
    } else {
        1.0
    };

    Ok(OptionsRatio {
        symbol: symbol.ticker().to_string(),
        put_call_ratio: ratio,
        total_call_volume: calls,
        total_put_volume: puts,
        last_updated: Some(now),
    })
}

#[async_trait]
impl SourceProvider for YahooOptionsProvider {
    type Output = OptionsRatio;

    async fn fetch_latest(&self) -> Result<OptionsRatio, FetchError> {
        let doc = self.mode.load(self.name()).await?;
        parse_chain(self.symbol, &doc, Utc::now())
    }

    fn name(&self) -> &'static str {
        match self.symbol {
            Symbol::Spy => "spy_options",
            Symbol::Qqq => "qqq_options",
            Symbol::Iwm => "iwm_options",
        }
    }
}
