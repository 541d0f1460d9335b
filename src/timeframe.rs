//! Per-lookback evaluation: split the window, direction-gate, run checks,
//! and combine the fired ones into a confidence-scored outcome.

use crate::checks;
use crate::config::EngineConfig;
use crate::enrichment::EnrichmentProvider;
use crate::models::{CheckResult, PriceDirection, SignalDirection, TimeframeOutcome};
use crate::series::MetricHistory;
use crate::stats;
use tracing::debug;

/// Confidence weights: each confirmation is worth 25 points, each unit of
/// aggregate SNR 20 points, capped at 100.
const CONFIRMATION_POINTS: u32 = 25;
const SNR_POINTS: f64 = 20.0;

pub struct TimeframeEvaluator;

impl TimeframeEvaluator {
    /// Evaluate one lookback window. Returns `None` while history is short,
    /// while price sits inside the flat dead-band, or when the fired checks
    /// fail the confirmation/SNR gates.
    pub fn evaluate(
        symbol: &str,
        history: &MetricHistory,
        lookback: usize,
        cfg: &EngineConfig,
        enrichment: Option<&dyn EnrichmentProvider>,
    ) -> Option<TimeframeOutcome> {
        let windows = history.window_set(lookback).ok()?;

        let (price_earlier, price_recent) = stats::split_window(&windows.price);
        let change_pct = stats::pct_change(stats::mean(price_earlier), stats::mean(price_recent));
        if change_pct.abs() < cfg.flat_band_pct {
            return None;
        }
        let direction = if change_pct > 0.0 {
            PriceDirection::Rising
        } else {
            PriceDirection::Falling
        };

        let mut results = checks::run_core_checks(&windows, direction, cfg);
        if let Some(provider) = enrichment {
            if let Some(funding) = provider.funding_rate(symbol) {
                results.push(checks::external::funding_divergence(
                    funding,
                    direction,
                    cfg.funding_threshold,
                ));
            }
            if let Some(asym) = provider.liquidity_asymmetry(symbol) {
                results.push(checks::external::liquidity_asymmetry(
                    asym,
                    direction,
                    cfg.liquidity_asymmetry_threshold,
                ));
            }
        }

        let fired: Vec<&CheckResult> = results.iter().filter(|r| r.fired).collect();
        let confirmed_count = fired.len();
        let aggregate_snr = if fired.is_empty() {
            0.0
        } else {
            fired.iter().map(|r| r.strength).sum::<f64>() / fired.len() as f64
        };

        if confirmed_count < cfg.min_signals_required
            || aggregate_snr < cfg.effective_snr_threshold()
        {
            return None;
        }

        let confidence = Self::confidence(confirmed_count, aggregate_snr);
        debug!(
            symbol,
            lookback,
            change_pct,
            confirmed_count,
            aggregate_snr,
            confidence,
            "timeframe outcome"
        );

        Some(TimeframeOutcome {
            direction: SignalDirection::contrarian_to(direction),
            timeframe_secs: lookback,
            confirmed_count,
            aggregate_snr,
            confidence,
            checks: results,
        })
    }

    /// min(100, confirmed*25 + floor(snr*20)); monotone in both inputs.
    pub fn confidence(confirmed_count: usize, aggregate_snr: f64) -> u8 {
        let points =
            confirmed_count as u32 * CONFIRMATION_POINTS + (aggregate_snr * SNR_POINTS) as u32;
        points.min(100) as u8
    }
}
