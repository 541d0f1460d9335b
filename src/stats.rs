//! Small numeric helpers shared by the checks and filters.

/// Floor applied to standard deviations so a dead-flat window cannot
/// produce an unbounded SNR.
pub const STDDEV_EPSILON: f64 = 1e-9;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Percentage change from `from` to `to`.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from.abs() * 100.0
}

/// Number of sign flips across consecutive values. Zeros carry the
/// previous sign.
pub fn sign_changes(values: &[f64]) -> usize {
    let mut changes = 0;
    let mut prev: f64 = 0.0;
    for &v in values {
        let s = if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            prev
        };
        if prev != 0.0 && s != 0.0 && s != prev {
            changes += 1;
        }
        if s != 0.0 {
            prev = s;
        }
    }
    changes
}

/// Split a window into the earlier two thirds and the recent third.
pub fn split_window(values: &[f64]) -> (&[f64], &[f64]) {
    let cut = values.len() * 2 / 3;
    values.split_at(cut)
}

/// Local signal-to-noise ratio: a measured shift scaled by the average
/// standard deviation of the two sub-windows. Capped so a dead-flat window
/// with a step cannot dominate the aggregate.
pub fn local_snr(shift: f64, earlier: &[f64], recent: &[f64]) -> f64 {
    let noise = (stddev(earlier) + stddev(recent)) / 2.0;
    (shift.abs() / noise.max(STDDEV_EPSILON)).min(100.0)
}
