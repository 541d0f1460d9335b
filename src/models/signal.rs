//! Signal output types and the records shared between evaluator stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction of an emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    /// The reversal trade runs against the detected price move.
    pub fn contrarian_to(price: PriceDirection) -> Self {
        match price {
            PriceDirection::Falling => SignalDirection::Long,
            PriceDirection::Rising => SignalDirection::Short,
        }
    }
}

/// Direction of the evaluated price move. Carried as a sign so the checks
/// stay symmetric instead of duplicating long/short branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceDirection {
    Rising,
    Falling,
}

impl PriceDirection {
    pub fn sign(self) -> f64 {
        match self {
            PriceDirection::Rising => 1.0,
            PriceDirection::Falling => -1.0,
        }
    }
}

/// The individual checks a timeframe evaluation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CheckKind {
    ImbalanceDivergence,
    DepthBuilding,
    SpreadContraction,
    VolumeExhaustion,
    FundingDivergence,
    LiquidityAsymmetry,
}

/// Outcome of one check over an earlier/recent window pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub fired: bool,
    /// Local SNR of the measured shift; meaningful when fired.
    pub strength: f64,
}

impl CheckResult {
    pub fn fired(kind: CheckKind, strength: f64) -> Self {
        Self {
            kind,
            fired: true,
            strength,
        }
    }

    pub fn quiet(kind: CheckKind) -> Self {
        Self {
            kind,
            fired: false,
            strength: 0.0,
        }
    }
}

/// Result of evaluating one lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeOutcome {
    pub direction: SignalDirection,
    pub timeframe_secs: usize,
    pub confirmed_count: usize,
    pub aggregate_snr: f64,
    /// 0-100, monotone in both confirmed_count and aggregate_snr.
    pub confidence: u8,
    pub checks: Vec<CheckResult>,
}

/// Category of an emitted signal. The divergence engine emits reversal
/// calls; the tag keeps downstream consumers from guessing by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Reversal,
}

/// The engine's sole externally visible output. Immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub direction: SignalDirection,
    pub confidence: u8,
    pub entry_price: f64,
    pub snr: f64,
    pub timeframe_secs: usize,
    pub signals_confirmed: usize,
    pub checks: Vec<CheckResult>,
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    pub fn from_outcome(
        symbol: &str,
        outcome: &TimeframeOutcome,
        entry_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind: SignalKind::Reversal,
            direction: outcome.direction,
            confidence: outcome.confidence,
            entry_price,
            snr: outcome.aggregate_snr,
            timeframe_secs: outcome.timeframe_secs,
            signals_confirmed: outcome.confirmed_count,
            checks: outcome.checks.clone(),
            timestamp,
        }
    }
}
