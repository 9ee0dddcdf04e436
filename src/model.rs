//! # Market Snapshot
//! Typed view of `market-data.json`: one fetch cycle's worth of raw indicator
//! series. Built once by the fetch stage, read-only afterwards.
//!
//! Series are most-recent-first. A series with a non-empty `historical` list
//! always has `current == historical[0]`; `MarketSnapshot::from_json_str`
//! re-establishes that when a hand-edited document disagrees.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longest history kept per series (one month of daily closes).
pub const MAX_HISTORY: usize = 30;

/// Tracked equity index ETFs. Closed set, so no string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Spy,
    Qqq,
    Iwm,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::Spy, Symbol::Qqq, Symbol::Iwm];

    pub fn ticker(self) -> &'static str {
        match self {
            Symbol::Spy => "SPY",
            Symbol::Qqq => "QQQ",
            Symbol::Iwm => "IWM",
        }
    }

    /// Human name of the index the ETF tracks.
    pub fn index_name(self) -> &'static str {
        match self {
            Symbol::Spy => "S&P 500",
            Symbol::Qqq => "Nasdaq 100",
            Symbol::Iwm => "Russell 2000",
        }
    }
}

/// One observation of a raw metric. Price samples arrive as `price` and are
/// read into `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSample {
    pub date: NaiveDate,
    #[serde(alias = "price")]
    pub value: f64,
    /// Provider rating, fear & greed only (e.g. "greed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// Close minus open, price samples only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Day-over-day % change, set on the `current` sample of price series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl IndicatorSample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            rating: None,
            volume: None,
            change: None,
            change_percent: None,
        }
    }

    pub fn rated(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.change = Some(change);
        self
    }

    pub fn with_change_percent(mut self, pct: f64) -> Self {
        self.change_percent = Some(pct);
        self
    }
}

/// A single indicator's time series (≤ 30 samples, newest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSeries {
    pub current: IndicatorSample,
    #[serde(default)]
    pub historical: Vec<IndicatorSample>,
    pub last_updated: DateTime<Utc>,
}

impl IndicatorSeries {
    /// Build a series from newest-first samples. Returns `None` for an empty list.
    pub fn from_historical(
        mut historical: Vec<IndicatorSample>,
        last_updated: DateTime<Utc>,
    ) -> Option<Self> {
        historical.truncate(MAX_HISTORY);
        let current = historical.first()?.clone();
        Some(Self {
            current,
            historical,
            last_updated,
        })
    }

    /// Latest raw value.
    pub fn latest(&self) -> f64 {
        self.current.value
    }

    /// Day-over-day % change of the current sample; 0 when unknown.
    pub fn change_percent(&self) -> f64 {
        self.current
            .change_percent
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// The first `n` historical values (fewer if the series is shorter).
    pub fn window(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        self.historical.iter().take(n).map(|s| s.value)
    }

    /// Set the day-over-day change% on the newest sample.
    pub fn set_change_percent(&mut self, pct: f64) {
        self.current.change_percent = Some(pct);
        if let Some(head) = self.historical.first_mut() {
            head.change_percent = Some(pct);
        }
    }

    /// Restore `current == historical[0]`. A current sample for the same day
    /// fills in fields the head lacks; a change% on the current sample is
    /// always kept. Returns true when the two disagreed on date or value.
    fn reconcile(&mut self) -> bool {
        let Some(head) = self.historical.first_mut() else {
            return false;
        };
        if *head == self.current {
            return false;
        }
        let realigned = head.date != self.current.date || head.value != self.current.value;

        let cur = &self.current;
        if !realigned {
            head.rating = head.rating.take().or_else(|| cur.rating.clone());
            head.volume = head.volume.or(cur.volume);
            head.change = head.change.or(cur.change);
        }
        head.change_percent = cur.change_percent.or(head.change_percent);
        self.current = head.clone();
        realigned
    }
}

/// Put/call volume ratio for one symbol's nearest expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRatio {
    pub symbol: String,
    pub put_call_ratio: f64,
    #[serde(default)]
    pub total_call_volume: u64,
    #[serde(default)]
    pub total_put_volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl OptionsRatio {
    /// The ratio if it carries information; zero/NaN count as unavailable.
    pub fn usable_ratio(&self) -> Option<f64> {
        Some(self.put_call_ratio).filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Options ratios per symbol; `None` means the source could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsSnapshot {
    #[serde(default)]
    pub spy: Option<OptionsRatio>,
    #[serde(default)]
    pub qqq: Option<OptionsRatio>,
    #[serde(default)]
    pub iwm: Option<OptionsRatio>,
}

impl OptionsSnapshot {
    pub fn get(&self, symbol: Symbol) -> Option<&OptionsRatio> {
        match symbol {
            Symbol::Spy => self.spy.as_ref(),
            Symbol::Qqq => self.qqq.as_ref(),
            Symbol::Iwm => self.iwm.as_ref(),
        }
    }

    pub fn set(&mut self, symbol: Symbol, ratio: Option<OptionsRatio>) {
        match symbol {
            Symbol::Spy => self.spy = ratio,
            Symbol::Qqq => self.qqq = ratio,
            Symbol::Iwm => self.iwm = ratio,
        }
    }

    /// Number of sources absent from the snapshot.
    pub fn missing_count(&self) -> usize {
        Symbol::ALL
            .iter()
            .filter(|s| self.get(**s).is_none())
            .count()
    }
}

/// Everything one analysis run needs. Never partially filled: the fetch
/// layer substitutes placeholder series for failed sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub fear_greed: IndicatorSeries,
    pub spy: IndicatorSeries,
    pub qqq: IndicatorSeries,
    pub iwm: IndicatorSeries,
    pub vix: IndicatorSeries,
    #[serde(default)]
    pub options: OptionsSnapshot,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    pub fn equity(&self, symbol: Symbol) -> &IndicatorSeries {
        match symbol {
            Symbol::Spy => &self.spy,
            Symbol::Qqq => &self.qqq,
            Symbol::Iwm => &self.iwm,
        }
    }

    /// Parse a snapshot document and re-establish the series invariants.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let mut snap: MarketSnapshot =
            serde_json::from_str(s).context("parsing market snapshot")?;
        snap.reconcile();
        Ok(snap)
    }

    fn reconcile(&mut self) {
        for (name, series) in [
            ("fearGreed", &mut self.fear_greed),
            ("spy", &mut self.spy),
            ("qqq", &mut self.qqq),
            ("iwm", &mut self.iwm),
            ("vix", &mut self.vix),
        ] {
            series.historical.truncate(MAX_HISTORY);
            if series.reconcile() {
                tracing::warn!(
                    series = name,
                    "current sample disagreed with historical[0]; realigned"
                );
            }
        }
    }
}
