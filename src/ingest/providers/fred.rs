// src/ingest/providers/fred.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::{as_number, Mode};
use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::types::SourceProvider;
use crate::model::{IndicatorSample, IndicatorSeries, MAX_HISTORY};

const NAME: &str = "vix";

/// FRED `VIXCLS` observations.
pub struct FredVixProvider {
    mode: Mode,
}

impl FredVixProvider {
    pub fn new(cfg: &AppConfig, client: &reqwest::Client) -> Self {
        let url = format!(
            "https://api.stlouisfed.org/fred/series/observations?series_id=VIXCLS\
             &api_key={}&file_type=json&limit={MAX_HISTORY}&sort_order=desc",
            cfg.fred_api_key
        );
        Self {
            mode: Mode::http(url, client, cfg),
        }
    }

    pub fn from_fixture(doc: Value) -> Self {
        Self {
            mode: Mode::Fixture(doc),
        }
    }
}

/// Missing observations (`"."`) are skipped.
pub fn parse_observations(doc: &Value, now: DateTime<Utc>) -> Result<IndicatorSeries, FetchError> {
    let obs = doc
        .get("observations")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::malformed(NAME, "missing observations"))?;

    let mut rows: Vec<IndicatorSample> = obs
        .iter()
        .filter_map(|o| {
            let date = NaiveDate::parse_from_str(o.get("date")?.as_str()?, "%Y-%m-%d").ok()?;
            let value = as_number(o.get("value")?)?;
            Some(IndicatorSample::new(date, value))
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    IndicatorSeries::from_historical(rows, now).ok_or(FetchError::Empty(NAME))
}

#[async_trait]
impl SourceProvider for FredVixProvider {
    type Output = IndicatorSeries;

    async fn fetch_latest(&self) -> Result<IndicatorSeries, FetchError> {
        let doc = self.mode.load(NAME).await?;
        parse_observations(&doc, Utc::now())
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dots_are_skipped() {
        let doc = json!({ "observations": [
            { "date": "2025-03-04", "value": "." },
            { "date": "2025-03-03", "value": "22.78" },
            { "date": "2025-02-28", "value": "19.63" }
        ]});
        let s = parse_observations(&doc, Utc::now()).unwrap();
        assert_eq!(s.historical.len(), 2);
        assert_eq!(s.current.value, 22.78);
    }

    #[test]
    fn all_missing_is_empty() {
        let doc = json!({ "observations": [{ "date": "2025-03-04", "value": "." }] });
        assert!(matches!(parse_observations(&doc, Utc::now()), Err(FetchError::Empty(_))));
    }
}
