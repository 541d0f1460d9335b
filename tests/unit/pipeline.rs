//! Tests for the per-symbol worker pipeline

use crate::common_fixtures::falling_divergence_feed;
use tidewatch::config::EngineConfig;
use tidewatch::models::SignalDirection;
use tidewatch::pipeline::spawn_symbol_worker;
use tokio::sync::mpsc;

fn scenario_config() -> EngineConfig {
    EngineConfig {
        timeframes: vec![30],
        min_signals_required: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_worker_forwards_signals_and_stops_on_close() {
    let (snap_tx, snap_rx) = mpsc::channel(64);
    let (sig_tx, mut sig_rx) = mpsc::channel(16);

    let handle = spawn_symbol_worker("BTC-PERP".to_string(), scenario_config(), snap_rx, sig_tx)
        .expect("worker should spawn");

    for snap in falling_divergence_feed(30) {
        snap_tx.send(snap).await.unwrap();
    }
    drop(snap_tx);

    let signal = sig_rx.recv().await.expect("expected one signal");
    assert_eq!(signal.symbol, "BTC-PERP");
    assert_eq!(signal.direction, SignalDirection::Long);

    // Sender dropped, so the worker drains and exits.
    assert!(sig_rx.recv().await.is_none());
    handle.await.unwrap();
}

#[tokio::test]
async fn test_worker_rejects_bad_config() {
    let (_snap_tx, snap_rx) = mpsc::channel::<tidewatch::models::MarketSnapshot>(1);
    let (sig_tx, _sig_rx) = mpsc::channel(1);
    let cfg = EngineConfig {
        timeframes: vec![],
        ..Default::default()
    };
    assert!(spawn_symbol_worker("BTC-PERP".to_string(), cfg, snap_rx, sig_tx).is_err());
}

#[tokio::test]
async fn test_independent_symbol_workers() {
    let (btc_tx, btc_rx) = mpsc::channel(64);
    let (eth_tx, eth_rx) = mpsc::channel(64);
    let (sig_tx, mut sig_rx) = mpsc::channel(16);

    let btc = spawn_symbol_worker("BTC-PERP".to_string(), scenario_config(), btc_rx, sig_tx.clone())
        .unwrap();
    let eth =
        spawn_symbol_worker("ETH-PERP".to_string(), scenario_config(), eth_rx, sig_tx).unwrap();

    // Only the BTC worker sees a reversal setup; ETH gets nothing at all.
    for snap in falling_divergence_feed(30) {
        btc_tx.send(snap).await.unwrap();
    }
    drop(btc_tx);
    drop(eth_tx);

    let signal = sig_rx.recv().await.expect("expected the BTC signal");
    assert_eq!(signal.symbol, "BTC-PERP");
    assert!(sig_rx.recv().await.is_none());

    btc.await.unwrap();
    eth.await.unwrap();
}
