//! Reversal-preparation checks.
//!
//! Each check is a pure function of an earlier sub-window (first 2/3 of the
//! evaluation window) and a recent sub-window (last 1/3), plus the detected
//! price direction. Purity is what makes backtests reproducible: identical
//! slices always yield the identical (fired, strength) pair.

pub mod depth;
pub mod external;
pub mod imbalance;
pub mod spread;
pub mod volume;

use crate::config::EngineConfig;
use crate::models::{CheckResult, PriceDirection};
use crate::series::WindowSet;
use crate::stats;

/// Run the four core checks over an aligned window set.
pub fn run_core_checks(
    windows: &WindowSet,
    direction: PriceDirection,
    cfg: &EngineConfig,
) -> Vec<CheckResult> {
    let (imb_e, imb_r) = stats::split_window(&windows.imbalance);
    let (bid_e, bid_r) = stats::split_window(&windows.bid_depth);
    let (ask_e, ask_r) = stats::split_window(&windows.ask_depth);
    let (spr_e, spr_r) = stats::split_window(&windows.spread);
    let (vol_e, vol_r) = stats::split_window(&windows.volume);

    vec![
        imbalance::imbalance_divergence(
            imb_e,
            imb_r,
            direction,
            cfg.imbalance_divergence_threshold,
        ),
        depth::depth_building(bid_e, bid_r, ask_e, ask_r, direction, cfg.depth_growth_ratio),
        spread::spread_contraction(spr_e, spr_r, cfg.spread_contraction_ratio),
        volume::volume_exhaustion(vol_e, vol_r, cfg.volume_exhaustion_ratio),
    ]
}
