//! Immutable market snapshot input.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One order-book/trade observation for a symbol. Delivered by the
/// upstream transport at <= 1 update per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub best_bid: f64,
    pub best_ask: f64,
    /// Summed size across the top N bid levels.
    pub bid_depth: f64,
    /// Summed size across the top N ask levels.
    pub ask_depth: f64,
    /// Bid-ask spread as a percentage of mid.
    pub spread_pct: f64,
    /// Order book imbalance in [-1, 1]; positive = bid-heavy.
    pub imbalance: f64,
    /// Volume proxy for the interval.
    pub volume: f64,
}

impl MarketSnapshot {
    pub fn mid_price(&self) -> f64 {
        (self.best_bid + self.best_ask) / 2.0
    }

    /// Reject snapshots that would poison the rolling series: any
    /// non-finite field, or a timestamp not after the previous one.
    pub fn validate(&self, prev_ts: Option<DateTime<Utc>>) -> Result<(), EngineError> {
        let fields = [
            ("best_bid", self.best_bid),
            ("best_ask", self.best_ask),
            ("bid_depth", self.bid_depth),
            ("ask_depth", self.ask_depth),
            ("spread_pct", self.spread_pct),
            ("imbalance", self.imbalance),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::InvalidSnapshot(format!(
                    "non-finite {}: {}",
                    name, value
                )));
            }
        }
        if let Some(prev) = prev_ts {
            if self.timestamp <= prev {
                return Err(EngineError::InvalidSnapshot(format!(
                    "non-monotonic timestamp {} (previous {})",
                    self.timestamp, prev
                )));
            }
        }
        Ok(())
    }
}
