//! End-to-end tests for the reversal detector

use crate::common_fixtures::{falling_divergence_feed, snapshot};
use tidewatch::config::EngineConfig;
use tidewatch::detector::ReversalDetector;
use tidewatch::models::{SignalDirection, SignalKind};

fn scenario_config() -> EngineConfig {
    EngineConfig {
        timeframes: vec![30],
        min_signals_required: 2,
        ..Default::default()
    }
}

#[test]
fn test_signal_emitted_after_warmup() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    let feed = falling_divergence_feed(30);

    for snap in &feed[..29] {
        assert!(detector.update(snap).is_none());
    }
    let signal = detector
        .update(&feed[29])
        .expect("expected a signal on the 30th sample");

    assert_eq!(signal.symbol, "BTC-PERP");
    assert_eq!(signal.kind, SignalKind::Reversal);
    assert_eq!(signal.direction, SignalDirection::Long);
    assert_eq!(signal.timeframe_secs, 30);
    assert!(signal.signals_confirmed >= 2);
    assert!(signal.snr >= 1.0);
    assert!((signal.entry_price - feed[29].mid_price()).abs() < 1e-9);

    let state = detector.state();
    assert!(state.warmed_up);
    assert_eq!(state.samples, 30);
    assert_eq!(state.last_signal_at, Some(feed[29].timestamp));
}

#[test]
fn test_duplicate_signal_throttled() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    let feed = falling_divergence_feed(30);
    let mut emitted = 0;
    for snap in &feed {
        if detector.update(snap).is_some() {
            emitted += 1;
        }
    }
    // Continuation ticks at the same level inside the cooldown.
    for j in 0..5 {
        let snap = snapshot(30 + j, 99.5, 13.0, 10.0, 0.01, 0.2, 120.0);
        if detector.update(&snap).is_some() {
            emitted += 1;
        }
    }
    assert_eq!(emitted, 1);
}

#[test]
fn test_invalid_snapshot_skipped() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    detector.update(&snapshot(0, 100.0, 10.0, 10.0, 0.01, 0.0, 100.0));

    let broken = snapshot(1, f64::NAN, 10.0, 10.0, 0.01, 0.0, 100.0);
    assert!(detector.update(&broken).is_none());
    assert_eq!(detector.state().samples, 1);
}

#[test]
fn test_stale_timestamp_skipped() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    detector.update(&snapshot(5, 100.0, 10.0, 10.0, 0.01, 0.0, 100.0));
    // Same timestamp again must be rejected.
    assert!(detector
        .update(&snapshot(5, 100.0, 10.0, 10.0, 0.01, 0.0, 100.0))
        .is_none());
    assert_eq!(detector.state().samples, 1);
}

#[test]
fn test_reset_clears_state() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    for snap in falling_divergence_feed(30) {
        detector.update(&snap);
    }
    detector.reset();

    let state = detector.state();
    assert_eq!(state.samples, 0);
    assert!(!state.warmed_up);
    assert!(state.last_signal_at.is_none());

    // History is gone, so the old timestamps are acceptable again and the
    // throttle no longer remembers the emitted signal.
    let feed = falling_divergence_feed(30);
    let mut emitted = 0;
    for snap in &feed {
        if detector.update(snap).is_some() {
            emitted += 1;
        }
    }
    assert_eq!(emitted, 1);
}

#[test]
fn test_signal_wire_shape() {
    let mut detector = ReversalDetector::new("BTC-PERP", scenario_config()).unwrap();
    let mut signal = None;
    for snap in falling_divergence_feed(30) {
        signal = signal.or(detector.update(&snap));
    }
    let signal = signal.expect("expected a signal");

    // The record consumers receive carries an explicit type tag next to
    // the direction.
    let json = serde_json::to_value(&signal).unwrap();
    assert_eq!(json["type"], "REVERSAL");
    assert_eq!(json["direction"], "LONG");
    assert_eq!(json["symbol"], "BTC-PERP");
    assert!(json["confidence"].is_u64());
}

#[test]
fn test_invalid_config_rejected() {
    let cfg = EngineConfig {
        min_signals_required: 0,
        ..Default::default()
    };
    assert!(ReversalDetector::new("BTC-PERP", cfg).is_err());

    let cfg = EngineConfig {
        timeframes: vec![600],
        ..Default::default()
    };
    assert!(ReversalDetector::new("BTC-PERP", cfg).is_err());
}
