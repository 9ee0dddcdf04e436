// src/store.rs
//! JSON artifacts on disk: the raw snapshot and the analysis result.
//! Pretty-printed so the dashboard's data dir stays diffable.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::MarketSnapshot;
use crate::report::SentimentResult;

pub const SNAPSHOT_FILE: &str = "market-data.json";
pub const ANALYSIS_FILE: &str = "sentiment-analysis.json";

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let body = serde_json::to_string_pretty(value).context("serializing artifact")?;
    // Readers only ever observe a complete document.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

pub fn save_snapshot(path: &Path, snapshot: &MarketSnapshot) -> Result<()> {
    write_pretty(path, snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<MarketSnapshot> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    MarketSnapshot::from_json_str(&s)
}

pub fn save_result(path: &Path, result: &SentimentResult) -> Result<()> {
    write_pretty(path, result)
}

pub fn load_result(path: &Path) -> Result<SentimentResult> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading analysis from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing analysis {}", path.display()))
}
