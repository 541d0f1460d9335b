//! Volume exhaustion check.

use crate::models::{CheckKind, CheckResult};
use crate::stats;

const VOLUME_EPSILON: f64 = 1e-9;

/// Fires when average volume declines by more than `exhaustion_ratio`
/// between the sub-windows: the move is running out of participants.
pub fn volume_exhaustion(earlier: &[f64], recent: &[f64], exhaustion_ratio: f64) -> CheckResult {
    let earlier_mean = stats::mean(earlier);
    let recent_mean = stats::mean(recent);
    if earlier_mean <= VOLUME_EPSILON {
        return CheckResult::quiet(CheckKind::VolumeExhaustion);
    }

    let decline = (earlier_mean - recent_mean) / earlier_mean;
    if decline > exhaustion_ratio {
        CheckResult::fired(
            CheckKind::VolumeExhaustion,
            stats::local_snr(recent_mean - earlier_mean, earlier, recent),
        )
    } else {
        CheckResult::quiet(CheckKind::VolumeExhaustion)
    }
}
