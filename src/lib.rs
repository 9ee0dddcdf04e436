// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod analyze;
pub mod api;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod present;
pub mod report;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::model::MarketSnapshot;
pub use crate::report::SentimentResult;
