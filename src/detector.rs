//! Reversal detector orchestration.
//!
//! `update()` is pure in-memory computation: record the snapshot, evaluate
//! every configured timeframe, keep the strongest outcome, then run it
//! through the regime veto, the chop filter, and the throttle. At most one
//! signal per call; a missed window is lost by design.

use crate::chop::{ChopFilter, ChopMetrics};
use crate::config::{EngineConfig, MIN_WARMUP_SAMPLES};
use crate::enrichment::EnrichmentProvider;
use crate::error::EngineError;
use crate::models::{MarketSnapshot, Signal, TimeframeOutcome};
use crate::regime::{RegimeClassifier, TrendState};
use crate::series::MetricHistory;
use crate::throttle::SignalThrottle;
use crate::timeframe::TimeframeEvaluator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Read-only state snapshot for dashboards and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorState {
    pub symbol: String,
    pub samples: usize,
    pub warmed_up: bool,
    pub trend: TrendState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chop: Option<ChopMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_signal_at: Option<DateTime<Utc>>,
}

/// Streaming reversal detector for one symbol. Owns all of its buffers;
/// nothing here is shared across symbols.
pub struct ReversalDetector {
    symbol: String,
    cfg: EngineConfig,
    history: MetricHistory,
    regime: RegimeClassifier,
    throttle: SignalThrottle,
    enrichment: Option<Box<dyn EnrichmentProvider>>,
    last_ts: Option<DateTime<Utc>>,
    last_signal_at: Option<DateTime<Utc>>,
    samples: usize,
}

impl ReversalDetector {
    pub fn new(symbol: impl Into<String>, cfg: EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        Ok(Self {
            symbol: symbol.into(),
            history: MetricHistory::new(cfg.lookback_secs),
            regime: RegimeClassifier::new(cfg.wave_retrace_pct),
            throttle: SignalThrottle::new(cfg.signal_cooldown_secs, cfg.price_tolerance_pct),
            cfg,
            enrichment: None,
            last_ts: None,
            last_signal_at: None,
            samples: 0,
        })
    }

    /// Attach a pre-cached enrichment provider. Absence just skips the
    /// dependent checks.
    pub fn with_enrichment(mut self, provider: Box<dyn EnrichmentProvider>) -> Self {
        self.enrichment = Some(provider);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Ingest one snapshot and maybe emit a signal.
    pub fn update(&mut self, snapshot: &MarketSnapshot) -> Option<Signal> {
        if let Err(e) = snapshot.validate(self.last_ts) {
            warn!(symbol = %self.symbol, error = %e, "skipping snapshot");
            return None;
        }
        self.last_ts = Some(snapshot.timestamp);
        self.samples += 1;
        self.history.record(snapshot);
        self.regime
            .on_tick(snapshot.mid_price(), snapshot.volume, snapshot.timestamp);

        if self.history.len() < MIN_WARMUP_SAMPLES {
            return None;
        }

        let candidate = self.best_outcome()?;
        let trend = self.regime.trend_state();

        // Counter-trend calls need materially stronger evidence.
        if trend.bias.opposes(candidate.direction)
            && candidate.confidence < self.cfg.regime_override_confidence
            && candidate.aggregate_snr < self.cfg.regime_override_snr
        {
            debug!(
                symbol = %self.symbol,
                bias = ?trend.bias,
                direction = ?candidate.direction,
                confidence = candidate.confidence,
                snr = candidate.aggregate_snr,
                "regime veto"
            );
            return None;
        }

        // No override bypasses the chop filter.
        if ChopFilter::is_choppy(&self.history, self.cfg.chop_window) {
            debug!(symbol = %self.symbol, "chop filter suppressed signal");
            return None;
        }

        let price = snapshot.mid_price();
        if !self
            .throttle
            .allows(candidate.direction, price, snapshot.timestamp)
        {
            debug!(
                symbol = %self.symbol,
                direction = ?candidate.direction,
                "throttled duplicate signal"
            );
            return None;
        }

        self.throttle
            .record(candidate.direction, price, snapshot.timestamp);
        self.last_signal_at = Some(snapshot.timestamp);
        let signal = Signal::from_outcome(&self.symbol, &candidate, price, snapshot.timestamp);
        info!(
            symbol = %self.symbol,
            direction = ?signal.direction,
            confidence = signal.confidence,
            snr = signal.snr,
            timeframe = signal.timeframe_secs,
            "reversal signal emitted"
        );
        Some(signal)
    }

    /// Evaluate every configured timeframe, keep the highest aggregate SNR.
    fn best_outcome(&self) -> Option<TimeframeOutcome> {
        let mut best: Option<TimeframeOutcome> = None;
        for &tf in &self.cfg.timeframes {
            let outcome = TimeframeEvaluator::evaluate(
                &self.symbol,
                &self.history,
                tf,
                &self.cfg,
                self.enrichment.as_deref(),
            );
            if let Some(o) = outcome {
                let better = best
                    .as_ref()
                    .map(|b| o.aggregate_snr > b.aggregate_snr)
                    .unwrap_or(true);
                if better {
                    best = Some(o);
                }
            }
        }
        best
    }

    /// Drop all accumulated history and throttle state.
    pub fn reset(&mut self) {
        self.history = MetricHistory::new(self.cfg.lookback_secs);
        self.regime.reset();
        self.throttle.reset();
        self.last_ts = None;
        self.last_signal_at = None;
        self.samples = 0;
    }

    pub fn state(&self) -> DetectorState {
        DetectorState {
            symbol: self.symbol.clone(),
            samples: self.samples,
            warmed_up: self.history.len() >= MIN_WARMUP_SAMPLES,
            trend: self.regime.trend_state(),
            chop: ChopFilter::evaluate(&self.history, self.cfg.chop_window),
            last_signal_at: self.last_signal_at,
        }
    }
}
