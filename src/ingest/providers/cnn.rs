// src/ingest/providers/cnn.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{as_number, proxied, round2, Mode};
use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::types::SourceProvider;
use crate::model::{IndicatorSample, IndicatorSeries, MAX_HISTORY};

pub const CNN_GRAPH_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const NAME: &str = "fear_greed";

/// CNN fear & greed graph data.
pub struct CnnFearGreedProvider {
    mode: Mode,
}

impl CnnFearGreedProvider {
    pub fn new(cfg: &AppConfig, client: &reqwest::Client) -> Self {
        Self {
            mode: Mode::http(proxied(cfg, CNN_GRAPH_URL), client, cfg),
        }
    }

    pub fn from_fixture(doc: Value) -> Self {
        Self {
            mode: Mode::Fixture(doc),
        }
    }
}

/// Parse `fear_and_greed_historical.data[]` (`x` = epoch ms, `y` = value).
/// Points are ordered newest first regardless of the payload order.
pub fn parse_graph(doc: &Value, now: DateTime<Utc>) -> Result<IndicatorSeries, FetchError> {
    let points = doc
        .pointer("/fear_and_greed_historical/data")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::malformed(NAME, "missing fear_and_greed_historical.data"))?;

    let mut rows: Vec<(i64, IndicatorSample)> = points
        .iter()
        .filter_map(|p| {
            let ms = as_number(p.get("x")?)? as i64;
            let value = as_number(p.get("y")?)?;
            let date = DateTime::<Utc>::from_timestamp_millis(ms)?.date_naive();
            let mut s = IndicatorSample::new(date, round2(value));
            if let Some(r) = p.get("rating").and_then(Value::as_str) {
                s = s.rated(r);
            }
            Some((ms, s))
        })
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));

    let historical: Vec<_> = rows.into_iter().take(MAX_HISTORY).map(|(_, s)| s).collect();
    IndicatorSeries::from_historical(historical, now).ok_or(FetchError::Empty(NAME))
}

#[async_trait]
impl SourceProvider for CnnFearGreedProvider {
    type Output = IndicatorSeries;

    async fn fetch_latest(&self) -> Result<IndicatorSeries, FetchError> {
        let doc = self.mode.load(NAME).await?;
        parse_graph(&doc, Utc::now())
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
    fn newest_point_becomes_current() {
        let doc = json!({
            "fear_and_greed_historical": { "data": [
                { "x": 1_740_787_200_000.0_f64, "y": 41.123, "rating": "fear" },
                { "x": 1_740_873_600_000.0_f64, "y": 55.456, "rating": "greed" }
            ]}
        });
        let s = parse_graph(&doc, Utc::now()).unwrap();
        assert_eq!(s.historical.len(), 2);
        assert_eq!(s.current.value, 55.46);
        assert_eq!(s.current.rating.as_deref(), Some("greed"));
        assert_eq!(s.current.date.to_string(), "2025-03-02");
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_graph(&json!({ "fear_and_greed": {} }), Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
        let err = parse_graph(&json!({ "fear_and_greed_historical": { "data": [] } }), Utc::now())
            .unwrap_err();
        assert!(matches!(err, FetchError::Empty(_)));
    }
}
