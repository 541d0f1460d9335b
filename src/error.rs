//! Engine error taxonomy.
//!
//! Only configuration errors are fatal; data-quality problems are either
//! expressed as "no signal" (warm-up) or logged and skipped (bad snapshots).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Not enough history to evaluate. Recoverable by waiting.
    #[error("insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A snapshot failed validation (non-finite field or non-monotonic
    /// timestamp). Logged and skipped by the detector, never propagated.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Construction-time misconfiguration. Fatal.
    #[error("invalid configuration: {0}")]
    Config(String),
}
