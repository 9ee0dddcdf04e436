// src/ingest/providers/alpha_vantage.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{as_number, round2, Mode};
use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::types::SourceProvider;
use crate::model::{IndicatorSample, IndicatorSeries, Symbol, MAX_HISTORY};

const NAME: &str = "alpha_vantage";

/// Daily closes for one index ETF.
pub struct AlphaVantageProvider {
    symbol: Symbol,
    mode: Mode,
}

impl AlphaVantageProvider {
    pub fn new(symbol: Symbol, cfg: &AppConfig, client: &reqwest::Client) -> Self {
        let url = format!(
            "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY\
             &symbol={}&outputsize=compact&apikey={}",
            symbol.ticker(),
            cfg.alpha_vantage_key
        );
        Self {
            symbol,
            mode: Mode::http(url, client, cfg),
        }
    }

    pub fn from_fixture(symbol: Symbol, doc: Value) -> Self {
        Self {
            symbol,
            mode: Mode::Fixture(doc),
        }
    }
}

/// Parse a `TIME_SERIES_DAILY` document into a newest-first price series.
///
/// Each sample carries `volume` and `change = close - open`; the current
/// sample also gets the day-over-day `changePercent` (2 dp).
pub fn parse_daily(doc: &Value, now: DateTime<Utc>) -> Result<IndicatorSeries, FetchError> {
    let Some(series) = doc.get("Time Series (Daily)").and_then(Value::as_object) else {
        // Rate limiting comes back as 200 with a "Note"/"Information" body.
        let detail = doc
            .get("Note")
            .or_else(|| doc.get("Information"))
            .or_else(|| doc.get("Error Message"))
            .and_then(Value::as_str)
            .unwrap_or("missing \"Time Series (Daily)\"");
        return Err(FetchError::malformed(NAME, detail));
    };

    let mut rows: Vec<IndicatorSample> = series
        .iter()
        .filter_map(|(date, bar)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            let close = as_number(bar.get("4. close")?)?;
            let mut s = IndicatorSample::new(date, close);
            if let Some(open) = bar.get("1. open").and_then(as_number) {
                s = s.with_change(close - open);
            }
            if let Some(vol) = bar.get("5. volume").and_then(as_number) {
                s = s.with_volume(vol.max(0.0) as u64);
            }
            Some(s)
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.truncate(MAX_HISTORY);

    let (cur, prev) = match rows.as_slice() {
        [cur, prev, ..] => (cur.value, prev.value),
        _ => return Err(FetchError::Empty(NAME)),
    };
    if prev == 0.0 {
        return Err(FetchError::malformed(NAME, "previous close is zero"));
    }
    let pct = round2((cur - prev) / prev * 100.0);

    let mut out = IndicatorSeries::from_historical(rows, now).ok_or(FetchError::Empty(NAME))?;
    out.set_change_percent(pct);
    Ok(out)
}

#[async_trait]
impl SourceProvider for AlphaVantageProvider {
    type Output = IndicatorSeries;

    async fn fetch_latest(&self) -> Result<IndicatorSeries, FetchError> {
        let doc = self.mode.load(self.name()).await?;
        parse_daily(&doc, Utc::now())
    }

    fn name(&self) -> &'static str {
        match self.symbol {
            Symbol::Spy => "spy",
            Symbol::Qqq => "qqq",
            Symbol::Iwm => "iwm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "Meta Data": { "2. Symbol": "SPY" },
            "Time Series (Daily)": {
                "2025-03-03": {
                    "1. open": "500.00", "4. close": "505.00", "5. volume": "70000000"
                },
                "2025-03-04": {
                    "1. open": "505.00", "4. close": "510.05", "5. volume": "80000000"
                },
                "2025-02-28": {
                    "1. open": "498.00", "4. close": "499.00", "5. volume": "60000000"
                }
            }
        })
    }

    #[test]
    fn newest_first_with_change_percent() {
        let s = parse_daily(&doc(), Utc::now()).unwrap();
        assert_eq!(s.historical.len(), 3);
        assert_eq!(s.current.date.to_string(), "2025-03-04");
        assert_eq!(s.current.value, 510.05);
        assert_eq!(s.current.volume, Some(80_000_000));
        assert_eq!(s.current.change_percent, Some(1.0));
        assert_eq!(s.current, s.historical[0]);
        assert!((s.current.change.unwrap() - 5.05).abs() < 1e-9);
    }

    #[test]
    fn rate_limit_note_is_malformed() {
        let err = parse_daily(&json!({ "Note": "Thank you for using Alpha Vantage!" }), Utc::now())
            .unwrap_err();
        assert!(err.to_string().contains("Thank you"));
    }

    #[test]
    fn single_bar_is_not_enough() {
        let one = json!({ "Time Series (Daily)": {
            "2025-03-04": { "1. open": "1", "4. close": "2", "5. volume": "3" }
        }});
        assert!(matches!(parse_daily(&one, Utc::now()), Err(FetchError::Empty(_))));
    }
}
