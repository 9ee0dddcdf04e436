// src/ingest/types.rs
use crate::ingest::error::FetchError;
use crate::model::{IndicatorSeries, OptionsRatio};

/// One independent upstream source.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    type Output: Send;

    async fn fetch_latest(&self) -> Result<Self::Output, FetchError>;
    fn name(&self) -> &'static str;
}

pub type SeriesProvider = dyn SourceProvider<Output = IndicatorSeries>;
pub type OptionsProvider = dyn SourceProvider<Output = OptionsRatio>;

/// Result of one fan-out branch: either real data or the locally computed
/// substitute.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Fetched(T),
    Placeholder(T),
}

impl<T> SourceOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SourceOutcome::Placeholder(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            SourceOutcome::Fetched(v) | SourceOutcome::Placeholder(v) => v,
        }
    }
}
