//! Spread contraction check.

use crate::models::{CheckKind, CheckResult};
use crate::stats;

const SPREAD_EPSILON: f64 = 1e-9;

/// Fires when the average spread narrows by more than `contraction_ratio`
/// between the earlier and recent sub-windows. Market makers tightening
/// quotes after a flush is a reversal tell, independent of direction.
pub fn spread_contraction(
    earlier: &[f64],
    recent: &[f64],
    contraction_ratio: f64,
) -> CheckResult {
    let earlier_mean = stats::mean(earlier);
    let recent_mean = stats::mean(recent);
    if earlier_mean <= SPREAD_EPSILON {
        return CheckResult::quiet(CheckKind::SpreadContraction);
    }

    let narrowing = (earlier_mean - recent_mean) / earlier_mean;
    if narrowing > contraction_ratio {
        CheckResult::fired(
            CheckKind::SpreadContraction,
            stats::local_snr(recent_mean - earlier_mean, earlier, recent),
        )
    } else {
        CheckResult::quiet(CheckKind::SpreadContraction)
    }
}
