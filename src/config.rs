//! Engine configuration with fail-fast validation.
//!
//! All empirically tuned thresholds from the original detector live here as
//! named fields with their source values. Changing them is a tuning decision.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::env;

/// Internal safety floor for the SNR gate. Caller-supplied thresholds are
/// clamped up to this value, never down.
pub const SNR_FLOOR: f64 = 1.0;

/// Samples required before the detector evaluates anything.
pub const MIN_WARMUP_SAMPLES: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum retained history in seconds (ring buffer capacity; input is
    /// rate-limited upstream to <= 1 snapshot/s, so seconds == samples).
    pub lookback_secs: usize,
    /// Ordered evaluation windows, in seconds. Each must fit in
    /// `lookback_secs`.
    pub timeframes: Vec<usize>,
    /// Minimum fired checks for a timeframe outcome. Must be >= 1.
    pub min_signals_required: usize,
    /// SNR gate; clamped up to [`SNR_FLOOR`] at evaluation time.
    pub snr_threshold: f64,
    /// Flat dead-band: price moves below this pct are not evaluated.
    pub flat_band_pct: f64,

    // Check thresholds (source-tuned values)
    /// Relative imbalance shift required for the divergence check.
    pub imbalance_divergence_threshold: f64,
    /// Depth growth ratio for the depth-building check (1.30 = +30%).
    pub depth_growth_ratio: f64,
    /// Relative spread narrowing for the contraction check.
    pub spread_contraction_ratio: f64,
    /// Relative volume decline for the exhaustion check.
    pub volume_exhaustion_ratio: f64,
    /// Funding-rate magnitude that counts as crowded positioning.
    pub funding_threshold: f64,
    /// Liquidity-asymmetry magnitude that confirms the contrarian side.
    pub liquidity_asymmetry_threshold: f64,

    // Throttle
    pub signal_cooldown_secs: i64,
    /// Price distance (pct) that re-arms the throttle inside the cooldown.
    pub price_tolerance_pct: f64,

    // Regime veto overrides: counter-trend signals need one of these.
    pub regime_override_confidence: u8,
    pub regime_override_snr: f64,

    // Wave tracking / chop
    /// Retracement (pct of extreme) that closes a wave.
    pub wave_retrace_pct: f64,
    /// Trailing samples the chop filter inspects.
    pub chop_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_secs: 180,
            timeframes: vec![10, 30, 60, 120, 180],
            min_signals_required: 3,
            snr_threshold: 1.0,
            flat_band_pct: 0.2,
            imbalance_divergence_threshold: 0.30,
            depth_growth_ratio: 1.30,
            spread_contraction_ratio: 0.35,
            volume_exhaustion_ratio: 0.35,
            funding_threshold: 0.0001,
            liquidity_asymmetry_threshold: 0.3,
            signal_cooldown_secs: 300,
            price_tolerance_pct: 0.5,
            regime_override_confidence: 90,
            regime_override_snr: 2.0,
            wave_retrace_pct: 0.1,
            chop_window: 60,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration. Construction fails fast on nonsense;
    /// everything downstream can then assume a sane config.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_signals_required < 1 {
            return Err(EngineError::Config(
                "min_signals_required must be >= 1".to_string(),
            ));
        }
        if self.lookback_secs == 0 {
            return Err(EngineError::Config("lookback_secs must be > 0".to_string()));
        }
        if self.timeframes.is_empty() {
            return Err(EngineError::Config(
                "at least one timeframe is required".to_string(),
            ));
        }
        for &tf in &self.timeframes {
            if tf == 0 {
                return Err(EngineError::Config("timeframe must be > 0".to_string()));
            }
            if tf > self.lookback_secs {
                return Err(EngineError::Config(format!(
                    "timeframe {}s exceeds lookback {}s",
                    tf, self.lookback_secs
                )));
            }
        }
        if self.snr_threshold < 0.0 {
            return Err(EngineError::Config(
                "snr_threshold must be non-negative".to_string(),
            ));
        }
        if self.signal_cooldown_secs < 0 {
            return Err(EngineError::Config(
                "signal_cooldown_secs must be non-negative".to_string(),
            ));
        }
        if self.price_tolerance_pct < 0.0 || self.wave_retrace_pct <= 0.0 {
            return Err(EngineError::Config(
                "price tolerances must be positive".to_string(),
            ));
        }
        if self.chop_window == 0 {
            return Err(EngineError::Config("chop_window must be > 0".to_string()));
        }
        Ok(())
    }

    /// Effective SNR gate after the safety clamp.
    pub fn effective_snr_threshold(&self) -> f64 {
        self.snr_threshold.max(SNR_FLOOR)
    }

    /// Build from defaults with environment overrides, then validate.
    pub fn from_env() -> Result<Self, EngineError> {
        let mut cfg = Self::default();
        if let Some(v) = env_parse::<i64>("TIDEWATCH_COOLDOWN_SECS") {
            cfg.signal_cooldown_secs = v;
        }
        if let Some(v) = env_parse::<usize>("TIDEWATCH_MIN_SIGNALS") {
            cfg.min_signals_required = v;
        }
        if let Some(v) = env_parse::<f64>("TIDEWATCH_SNR_THRESHOLD") {
            cfg.snr_threshold = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Deployment environment, used by logging to pick a formatter.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}
