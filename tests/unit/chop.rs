//! Unit tests for the chop filter

use crate::common_fixtures::snapshot;
use tidewatch::chop::ChopFilter;
use tidewatch::series::MetricHistory;

#[test]
fn test_dead_market_is_exempt() {
    // Constant price, one-signed imbalance, perfectly symmetric depth: the
    // symmetry vote alone must not flag chop when the range is under 0.01%.
    let mut history = MetricHistory::new(120);
    for i in 0..60 {
        history.record(&snapshot(i, 100.0, 10.0, 10.0, 0.02, 0.3, 50.0));
    }
    let metrics = ChopFilter::evaluate(&history, 60).unwrap();
    assert!(!metrics.choppy);
    assert!(!ChopFilter::is_choppy(&history, 60));
}

#[test]
fn test_oscillating_market_is_choppy() {
    let mut history = MetricHistory::new(120);
    for i in 0..60 {
        let wave = (i as f64 * 0.7).sin();
        history.record(&snapshot(
            i,
            100.0 + 0.5 * wave,
            10.0,
            10.0,
            0.02,
            if i % 2 == 0 { 0.2 } else { -0.2 },
            50.0,
        ));
    }
    let metrics = ChopFilter::evaluate(&history, 60).unwrap();
    assert!(metrics.imbalance_persistence < 0.6);
    assert!(metrics.liquidity_symmetry > 0.6);
    assert!(metrics.choppy);
}

#[test]
fn test_clean_trend_is_not_choppy() {
    let mut history = MetricHistory::new(120);
    for i in 0..60 {
        let t = i as f64 / 59.0;
        history.record(&snapshot(i, 100.0 + 1.0 * t, 20.0, 5.0, 0.02, 0.3, 50.0));
    }
    let metrics = ChopFilter::evaluate(&history, 60).unwrap();
    assert!(metrics.imbalance_persistence >= 0.6);
    assert!(metrics.liquidity_symmetry <= 0.6);
    assert!(metrics.range_efficiency >= 0.5);
    assert!(!metrics.choppy);
}

#[test]
fn test_short_history_cannot_judge() {
    let mut history = MetricHistory::new(120);
    for i in 0..30 {
        history.record(&snapshot(i, 100.0, 10.0, 10.0, 0.02, 0.3, 50.0));
    }
    assert!(ChopFilter::evaluate(&history, 60).is_none());
    assert!(!ChopFilter::is_choppy(&history, 60));
}
