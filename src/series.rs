//! Fixed-capacity rolling buffers for per-metric history.
//!
//! One [`RollingSeries`] per metric, capacity = longest configured lookback.
//! The oldest entry is evicted on overflow, so a long-running process never
//! grows its history unboundedly.

use crate::error::EngineError;
use crate::models::snapshot::MarketSnapshot;
use std::collections::VecDeque;

/// Time-ordered buffer with O(1) append and bounded memory.
#[derive(Debug, Clone)]
pub struct RollingSeries {
    buf: VecDeque<f64>,
    capacity: usize,
}

impl RollingSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest past capacity.
    pub fn push(&mut self, value: f64) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<f64> {
        self.buf.back().copied()
    }

    /// The last `n` values, oldest first.
    pub fn window(&self, n: usize) -> Result<Vec<f64>, EngineError> {
        if self.buf.len() < n {
            return Err(EngineError::InsufficientData {
                needed: n,
                available: self.buf.len(),
            });
        }
        Ok(self.buf.iter().skip(self.buf.len() - n).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.buf.iter().copied()
    }
}

/// One rolling series per snapshot metric, recorded together so the
/// windows stay aligned.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    pub price: RollingSeries,
    pub imbalance: RollingSeries,
    pub bid_depth: RollingSeries,
    pub ask_depth: RollingSeries,
    pub spread: RollingSeries,
    pub volume: RollingSeries,
}

impl MetricHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            price: RollingSeries::new(capacity),
            imbalance: RollingSeries::new(capacity),
            bid_depth: RollingSeries::new(capacity),
            ask_depth: RollingSeries::new(capacity),
            spread: RollingSeries::new(capacity),
            volume: RollingSeries::new(capacity),
        }
    }

    pub fn record(&mut self, snapshot: &MarketSnapshot) {
        self.price.push(snapshot.mid_price());
        self.imbalance.push(snapshot.imbalance);
        self.bid_depth.push(snapshot.bid_depth);
        self.ask_depth.push(snapshot.ask_depth);
        self.spread.push(snapshot.spread_pct);
        self.volume.push(snapshot.volume);
    }

    /// Samples recorded so far (all series move in lockstep).
    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    /// Aligned windows over the last `n` samples for every metric.
    pub fn window_set(&self, n: usize) -> Result<WindowSet, EngineError> {
        Ok(WindowSet {
            price: self.price.window(n)?,
            imbalance: self.imbalance.window(n)?,
            bid_depth: self.bid_depth.window(n)?,
            ask_depth: self.ask_depth.window(n)?,
            spread: self.spread.window(n)?,
            volume: self.volume.window(n)?,
        })
    }
}

/// Aligned per-metric windows handed to the evaluator and filters.
#[derive(Debug, Clone)]
pub struct WindowSet {
    pub price: Vec<f64>,
    pub imbalance: Vec<f64>,
    pub bid_depth: Vec<f64>,
    pub ask_depth: Vec<f64>,
    pub spread: Vec<f64>,
    pub volume: Vec<f64>,
}
