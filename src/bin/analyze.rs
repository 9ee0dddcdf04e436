// src/bin/analyze.rs
//! Analyze `market-data.json` and write `sentiment-analysis.json`.

use anyhow::{Context, Result};

use market_sentiment::{
    analyze::Timeframe,
    config::AppConfig,
    engine, logging,
    model::Symbol,
    present::format::{format_change, format_price, format_value},
    store,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = AppConfig::load_default().context("loading config")?;
    let snapshot = store::load_snapshot(&cfg.snapshot_path())?;

    let result = engine::analyze_now(&snapshot);
    store::save_result(&cfg.analysis_path(), &result)?;

    println!("Overall: {}", result.headline());
    for sym in Symbol::ALL {
        let s = snapshot.equity(sym);
        println!(
            "  {:<12} {:>10} {:>8}",
            sym.index_name(),
            format_price(s.latest()),
            format_change(s.change_percent())
        );
    }
    println!("  {:<12} {:>10}", "VIX", format_value(snapshot.vix.latest(), 1));
    for tf in Timeframe::ALL {
        let r = result.timeframes.get(tf);
        println!("  {}: {} ({}, {:?})", tf.key(), r.score, r.label, r.trend);
    }
    Ok(())
}
