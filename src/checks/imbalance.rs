//! Imbalance divergence check.

use crate::models::{CheckKind, CheckResult, PriceDirection};
use crate::stats;

/// Scale floor so a near-zero earlier baseline cannot make the relative
/// threshold hair-triggered.
const SCALE_FLOOR: f64 = 0.1;

/// Fires when the order book imbalance shifts against the price move by
/// more than `threshold` relative to the earlier baseline. A falling price
/// with imbalance rotating toward the bids is the classic setup.
pub fn imbalance_divergence(
    earlier: &[f64],
    recent: &[f64],
    direction: PriceDirection,
    threshold: f64,
) -> CheckResult {
    let earlier_mean = stats::mean(earlier);
    let recent_mean = stats::mean(recent);
    let shift = recent_mean - earlier_mean;

    let opposes_price = shift * direction.sign() < 0.0;
    let scale = earlier_mean.abs().max(SCALE_FLOOR);
    if opposes_price && shift.abs() / scale > threshold {
        CheckResult::fired(
            CheckKind::ImbalanceDivergence,
            stats::local_snr(shift, earlier, recent),
        )
    } else {
        CheckResult::quiet(CheckKind::ImbalanceDivergence)
    }
}
