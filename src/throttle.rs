//! Signal throttle: cooldown plus price-proximity deduplication.

use crate::models::SignalDirection;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Suppresses repeated same-direction signals that are both inside the
/// cooldown window and within the price tolerance of the previous one.
/// Either an elapsed cooldown or enough price distance re-arms the gate.
#[derive(Debug, Clone)]
pub struct SignalThrottle {
    cooldown: Duration,
    price_tolerance_pct: f64,
    last_emitted: HashMap<SignalDirection, (DateTime<Utc>, f64)>,
}

impl SignalThrottle {
    pub fn new(cooldown_secs: i64, price_tolerance_pct: f64) -> Self {
        Self {
            cooldown: Duration::seconds(cooldown_secs),
            price_tolerance_pct,
            last_emitted: HashMap::new(),
        }
    }

    /// Would a signal with this direction/price pass right now?
    pub fn allows(&self, direction: SignalDirection, price: f64, ts: DateTime<Utc>) -> bool {
        let Some(&(last_ts, last_price)) = self.last_emitted.get(&direction) else {
            return true;
        };
        if ts - last_ts >= self.cooldown {
            return true;
        }
        if last_price == 0.0 {
            return false;
        }
        let distance_pct = ((price - last_price) / last_price).abs() * 100.0;
        distance_pct > self.price_tolerance_pct
    }

    /// Record an accepted emission.
    pub fn record(&mut self, direction: SignalDirection, price: f64, ts: DateTime<Utc>) {
        self.last_emitted.insert(direction, (ts, price));
    }

    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}
