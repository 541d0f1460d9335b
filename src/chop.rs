//! Chop/noise filter.
//!
//! A range-bound market flips imbalance constantly, quotes symmetrically,
//! and goes nowhere relative to the ground it covers. The filter votes on
//! those three reads and calls chop on two out of three.

use crate::series::MetricHistory;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Total price range (as a fraction of price) below which the market is
/// simply dead, not choppy.
const STABILITY_EXEMPTION: f64 = 0.0001; // 0.01%

const PERSISTENCE_CHOPPY_BELOW: f64 = 0.6;
const SYMMETRY_CHOPPY_ABOVE: f64 = 0.6;
const EFFICIENCY_CHOPPY_BELOW: f64 = 0.5;

/// Raw metrics behind a chop verdict, exposed for state introspection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChopMetrics {
    /// 1 - (imbalance sign changes / window).
    pub imbalance_persistence: f64,
    /// min(avg bid depth, avg ask depth) / max(...).
    pub liquidity_symmetry: f64,
    /// |last - first| / (max - min) of the price window.
    pub range_efficiency: f64,
    pub choppy: bool,
}

pub struct ChopFilter;

impl ChopFilter {
    /// Verdict over the trailing `window` samples. With less history than
    /// that the filter cannot judge and reports "not choppy"; the warm-up
    /// gate already covers the early phase.
    pub fn evaluate(history: &MetricHistory, window: usize) -> Option<ChopMetrics> {
        let windows = history.window_set(window).ok()?;

        let prices = &windows.price;
        let high = prices.iter().cloned().fold(f64::MIN, f64::max);
        let low = prices.iter().cloned().fold(f64::MAX, f64::min);
        let last = *prices.last()?;
        let first = *prices.first()?;

        // Dead market: nothing to classify, and a near-zero denominator
        // would make range efficiency meaningless.
        if last != 0.0 && (high - low) / last.abs() < STABILITY_EXEMPTION {
            return Some(ChopMetrics {
                imbalance_persistence: 1.0,
                liquidity_symmetry: 0.0,
                range_efficiency: 1.0,
                choppy: false,
            });
        }

        let changes = stats::sign_changes(&windows.imbalance);
        let imbalance_persistence = 1.0 - changes as f64 / window as f64;

        let bid_avg = stats::mean(&windows.bid_depth);
        let ask_avg = stats::mean(&windows.ask_depth);
        let liquidity_symmetry = if bid_avg.max(ask_avg) > 0.0 {
            bid_avg.min(ask_avg) / bid_avg.max(ask_avg)
        } else {
            0.0
        };

        let range = high - low;
        let range_efficiency = if range > 0.0 {
            (last - first).abs() / range
        } else {
            1.0
        };

        let votes = [
            imbalance_persistence < PERSISTENCE_CHOPPY_BELOW,
            liquidity_symmetry > SYMMETRY_CHOPPY_ABOVE,
            range_efficiency < EFFICIENCY_CHOPPY_BELOW,
        ]
        .iter()
        .filter(|&&v| v)
        .count();

        Some(ChopMetrics {
            imbalance_persistence,
            liquidity_symmetry,
            range_efficiency,
            choppy: votes >= 2,
        })
    }

    /// Convenience wrapper: `true` only on a positive chop verdict.
    pub fn is_choppy(history: &MetricHistory, window: usize) -> bool {
        Self::evaluate(history, window).map(|m| m.choppy).unwrap_or(false)
    }
}
