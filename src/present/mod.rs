// src/present/mod.rs
//! Presentation adapter: everything the dashboard needs beyond raw scores.

pub mod cache;
pub mod format;
pub mod gauge;
pub mod indicators;

pub use cache::{CacheStatus, CachedArtifact};
pub use gauge::GaugeView;
pub use indicators::Indicators;
