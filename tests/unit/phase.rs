//! Tests for the capitulation phase state machine

use crate::common_fixtures::snapshot;
use tidewatch::models::{MarketSnapshot, SignalDirection};
use tidewatch::phase::{PeerHint, PhaseState, PhaseStateMachine, SignalTier};

/// Selloff episode: calm open, wide-spread skewed arm, ten deepening ticks
/// with a volume crescendo, a depth-collapse capitulation print, two weak
/// ticks where the knife is still falling, then a sharp recovery: depth
/// refilled, spread snapped back, price wicking off the low on dying volume.
fn selloff_episode() -> Vec<MarketSnapshot> {
    vec![
        snapshot(0, 100.0, 10.0, 10.0, 0.02, 0.0, 100.0),
        snapshot(1, 99.8, 10.0, 10.0, 0.15, -0.12, 150.0),
        snapshot(2, 99.6, 9.5, 10.0, 0.18, -0.20, 200.0),
        snapshot(3, 99.4, 9.0, 10.0, 0.18, -0.22, 250.0),
        snapshot(4, 99.2, 8.5, 10.0, 0.18, -0.25, 300.0),
        snapshot(5, 99.0, 8.0, 10.0, 0.18, -0.25, 350.0),
        snapshot(6, 98.8, 7.5, 10.0, 0.18, -0.28, 400.0),
        snapshot(7, 98.6, 7.0, 10.0, 0.18, -0.30, 500.0),
        snapshot(8, 98.4, 6.8, 10.0, 0.18, -0.30, 600.0),
        snapshot(9, 98.2, 6.5, 10.0, 0.18, -0.32, 700.0),
        snapshot(10, 98.1, 6.2, 10.0, 0.18, -0.33, 750.0),
        snapshot(11, 98.0, 6.0, 10.0, 0.19, -0.35, 900.0),
        snapshot(12, 97.9, 5.5, 10.0, 0.25, -0.40, 700.0),
        snapshot(13, 97.85, 5.6, 10.0, 0.22, -0.35, 400.0),
        snapshot(14, 97.9, 5.8, 10.0, 0.21, -0.30, 350.0),
        snapshot(15, 98.3, 9.0, 10.0, 0.05, 0.45, 100.0),
    ]
}

#[test]
fn test_wide_spread_skew_arms_selloff() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    assert!(machine
        .update(&snapshot(0, 100.0, 10.0, 10.0, 0.15, -0.09, 100.0), None)
        .is_none());
    assert_eq!(machine.state(), PhaseState::Selloff);
    assert_eq!(machine.direction(), Some(SignalDirection::Long));
}

#[test]
fn test_positive_skew_arms_rally() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    machine.update(&snapshot(0, 100.0, 10.0, 10.0, 0.15, 0.09, 100.0), None);
    assert_eq!(machine.state(), PhaseState::Rally);
    assert_eq!(machine.direction(), Some(SignalDirection::Short));
}

#[test]
fn test_one_sided_evidence_does_not_arm() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    // Tight spread with heavy skew.
    machine.update(&snapshot(0, 100.0, 10.0, 10.0, 0.05, -0.20, 100.0), None);
    assert_eq!(machine.state(), PhaseState::Normal);
    // Wide spread with a balanced book.
    machine.update(&snapshot(1, 100.0, 10.0, 10.0, 0.15, -0.05, 100.0), None);
    assert_eq!(machine.state(), PhaseState::Normal);
}

#[test]
fn test_depth_collapse_marks_capitulation() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    for snap in &selloff_episode()[..12] {
        machine.update(snap, None);
    }
    // Tick 12 blows the spread out while bid depth sits under 1.2x its
    // episode minimum.
    assert_eq!(machine.state(), PhaseState::Selloff);
    let snap = &selloff_episode()[12];
    assert!(machine.update(snap, None).is_none());
    assert_eq!(machine.state(), PhaseState::Capitulation);
}

#[test]
fn test_full_episode_emits_once_on_recovery() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    let peer = PeerHint {
        state: PhaseState::Reversal,
        confidence: 0.85,
    };

    let feed = selloff_episode();
    let mut signals = Vec::new();
    for snap in &feed {
        if let Some(signal) = machine.update(snap, Some(peer)) {
            signals.push(signal);
        }
    }

    // The weak post-capitulation ticks score under the emission floor; only
    // the recovery print gets through.
    assert_eq!(signals.len(), 1);
    let signal = &signals[0];
    assert_eq!(signal.direction, SignalDirection::Long);
    assert!(signal.confidence >= 0.75);
    assert_eq!(signal.entry_price, feed[15].mid_price());
    assert_eq!(machine.state(), PhaseState::Reversal);
}

#[test]
fn test_reversal_is_terminal_until_reset() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    let peer = PeerHint {
        state: PhaseState::Reversal,
        confidence: 0.85,
    };
    for snap in &selloff_episode() {
        machine.update(snap, Some(peer));
    }
    assert_eq!(machine.state(), PhaseState::Reversal);

    // Even a fresh capitulation-shaped print changes nothing.
    assert!(machine
        .update(&snapshot(16, 98.5, 9.5, 10.0, 0.04, 0.5, 90.0), None)
        .is_none());
    assert_eq!(machine.state(), PhaseState::Reversal);

    machine.reset();
    assert_eq!(machine.state(), PhaseState::Normal);
    assert!(machine.direction().is_none());
}

#[test]
fn test_episode_without_recovery_never_emits() {
    let mut machine = PhaseStateMachine::new("BTC-PERP");
    // Stop the feed before the recovery print.
    for snap in &selloff_episode()[..15] {
        assert!(machine.update(snap, None).is_none());
    }
    assert_eq!(machine.state(), PhaseState::Capitulation);
}

#[test]
fn test_tier_boundaries() {
    assert_eq!(
        SignalTier::for_confidence(0.96),
        Some(SignalTier::UltraPrecise)
    );
    assert_eq!(
        SignalTier::for_confidence(0.95),
        Some(SignalTier::UltraPrecise)
    );
    assert_eq!(
        SignalTier::for_confidence(0.92),
        Some(SignalTier::Conservative)
    );
    assert_eq!(SignalTier::for_confidence(0.87), Some(SignalTier::Balanced));
    assert_eq!(
        SignalTier::for_confidence(0.75),
        Some(SignalTier::Aggressive)
    );
    assert_eq!(SignalTier::for_confidence(0.74), None);
    assert_eq!(SignalTier::for_confidence(0.0), None);
}
