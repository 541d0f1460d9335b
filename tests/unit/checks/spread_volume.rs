//! Unit tests for the spread contraction and volume exhaustion checks

use tidewatch::checks::spread::spread_contraction;
use tidewatch::checks::volume::volume_exhaustion;

#[test]
fn test_spread_contraction_fires_past_ratio() {
    let earlier = [0.09, 0.10, 0.11];
    let recent = [0.055, 0.065];
    // Mean narrows 0.10 -> 0.06, a 40% contraction.
    let result = spread_contraction(&earlier, &recent, 0.35);
    assert!(result.fired);
    assert!(result.strength > 0.0);
}

#[test]
fn test_spread_contraction_quiet_on_mild_narrowing() {
    let earlier = [0.09, 0.10, 0.11];
    let recent = [0.078, 0.082];
    let result = spread_contraction(&earlier, &recent, 0.35);
    assert!(!result.fired);
}

#[test]
fn test_spread_contraction_quiet_on_zero_baseline() {
    let result = spread_contraction(&[0.0, 0.0], &[0.0], 0.35);
    assert!(!result.fired);
}

#[test]
fn test_volume_exhaustion_fires_on_decline() {
    let earlier = [90.0, 100.0, 110.0];
    let recent = [55.0, 65.0];
    // Mean declines 100 -> 60.
    let result = volume_exhaustion(&earlier, &recent, 0.35);
    assert!(result.fired);
}

#[test]
fn test_volume_exhaustion_quiet_on_steady_volume() {
    let earlier = [90.0, 100.0, 110.0];
    let recent = [78.0, 82.0];
    let result = volume_exhaustion(&earlier, &recent, 0.35);
    assert!(!result.fired);

    let growing = volume_exhaustion(&[100.0, 100.0], &[150.0], 0.35);
    assert!(!growing.fired);
}
