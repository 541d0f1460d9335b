//! Demo feed: pushes a synthetic capitulation sequence through a detector
//! and prints whatever it emits.

use chrono::{Duration, Utc};
use dotenvy::dotenv;
use tidewatch::config::EngineConfig;
use tidewatch::detector::ReversalDetector;
use tidewatch::logging;
use tidewatch::models::{MarketSnapshot, Signal};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let mut cfg = EngineConfig::from_env()?;
    cfg.timeframes = vec![10, 30, 60];
    cfg.min_signals_required = 2;
    let mut detector = ReversalDetector::new("BTC-PERP", cfg)?;

    info!("feeding synthetic selloff with building bids");
    let start = Utc::now();
    let mut emitted = Vec::new();
    for i in 0..60 {
        let t = i as f64 / 59.0;
        let mid = 50_000.0 * (1.0 - 0.005 * t);
        let snapshot = MarketSnapshot {
            symbol: "BTC-PERP".to_string(),
            timestamp: start + Duration::seconds(i),
            best_bid: mid - 2.5,
            best_ask: mid + 2.5,
            bid_depth: 10.0 + 4.0 * t,
            ask_depth: 10.0,
            spread_pct: 0.01,
            imbalance: -0.2 + 0.45 * t,
            volume: 120.0,
        };
        if let Some(signal) = detector.update(&snapshot) {
            print_signal(&signal)?;
            emitted.push(signal);
        }
    }

    info!(signals = emitted.len(), "demo feed complete");
    Ok(())
}

/// One JSON line per signal, the same record the persistence consumer
/// would receive.
fn print_signal(signal: &Signal) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(signal)?);
    Ok(())
}
