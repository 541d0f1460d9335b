//! tidewatch — streaming reversal-signal detection over order-book
//! microstructure.
//!
//! The engine ingests per-second [`models::MarketSnapshot`]s for one symbol
//! and emits a [`models::Signal`] when rolling multi-timeframe divergence
//! analysis shows statistically distinguishable preparation for a reversal.
//! A parallel [`phase::PhaseStateMachine`] tracks explicit
//! capitulation-to-reversal episodes instead.
//!
//! `update()` never blocks and performs no I/O; transport, persistence, and
//! enrichment refresh live outside this crate.

pub mod checks;
pub mod chop;
pub mod config;
pub mod detector;
pub mod enrichment;
pub mod error;
pub mod logging;
pub mod models;
pub mod phase;
pub mod pipeline;
pub mod regime;
pub mod series;
pub mod stats;
pub mod throttle;
pub mod timeframe;

pub use config::EngineConfig;
pub use detector::{DetectorState, ReversalDetector};
pub use error::EngineError;
pub use models::{MarketSnapshot, Signal, SignalDirection, SignalKind};
pub use phase::{PhaseSignal, PhaseState, PhaseStateMachine};
