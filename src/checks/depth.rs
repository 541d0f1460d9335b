//! Depth-building check.

use crate::models::{CheckKind, CheckResult, PriceDirection};
use crate::stats;

const DEPTH_EPSILON: f64 = 1e-9;

/// Fires when resting liquidity builds on the side opposing the price move:
/// bids while price falls, asks while price rises. Growth is measured across
/// the whole evaluation window (newest recent value against oldest earlier
/// value); the strength term stays mean-based like the other checks.
pub fn depth_building(
    bid_earlier: &[f64],
    bid_recent: &[f64],
    ask_earlier: &[f64],
    ask_recent: &[f64],
    direction: PriceDirection,
    growth_ratio: f64,
) -> CheckResult {
    let (earlier, recent) = match direction {
        PriceDirection::Falling => (bid_earlier, bid_recent),
        PriceDirection::Rising => (ask_earlier, ask_recent),
    };
    let (Some(&base), Some(&latest)) = (earlier.first(), recent.last()) else {
        return CheckResult::quiet(CheckKind::DepthBuilding);
    };

    let growth = latest / base.max(DEPTH_EPSILON);
    if growth >= growth_ratio {
        let shift = stats::mean(recent) - stats::mean(earlier);
        CheckResult::fired(
            CheckKind::DepthBuilding,
            stats::local_snr(shift, earlier, recent),
        )
    } else {
        CheckResult::quiet(CheckKind::DepthBuilding)
    }
}
