//! Capitulation/exhaustion phase tracking.
//!
//! A parallel detector variant: instead of windowed divergence analysis it
//! walks an explicit state machine NORMAL -> {SELLOFF, RALLY} ->
//! {CAPITULATION, RALLY_EXHAUSTION} -> REVERSAL, scoring eleven weighted
//! confirmation layers while sitting in the terminal-candidate state.
//! Transitions only move forward along one path per episode; the machine
//! returns to NORMAL exclusively through `reset()`.

pub mod layers;

use crate::models::{MarketSnapshot, SignalDirection};
use crate::series::MetricHistory;
use chrono::{DateTime, Utc};
use layers::LayerContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Book skew (imbalance) magnitude that arms a selloff/rally episode.
const SKEW_ENTER: f64 = 0.08;
/// Spread (pct) required alongside the skew to arm an episode.
const SPREAD_ENTER: f64 = 0.1;
/// Spread blowout (pct) marking capitulation/exhaustion.
const SPREAD_BLOWOUT: f64 = 0.2;
/// Depth within this factor of its running minimum counts as collapsed.
const DEPTH_COLLAPSE_FACTOR: f64 = 1.2;

/// Baseline before layer scores and penalties.
const BASE_CONFIDENCE: f64 = 0.5;

/// Snapshots of context the layer scoring keeps.
const PHASE_HISTORY: usize = 60;
/// Minimum samples inside an episode before window-based layers score.
const MIN_LAYER_SAMPLES: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseState {
    Normal,
    Selloff,
    Capitulation,
    Reversal,
    Rally,
    RallyExhaustion,
}

/// Emission tier selected by total confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalTier {
    UltraPrecise,
    Conservative,
    Balanced,
    Aggressive,
}

impl SignalTier {
    /// Tier for a confidence in [0, 1]; below 0.75 emits nothing.
    pub fn for_confidence(confidence: f64) -> Option<Self> {
        if confidence >= 0.95 {
            Some(SignalTier::UltraPrecise)
        } else if confidence >= 0.90 {
            Some(SignalTier::Conservative)
        } else if confidence >= 0.85 {
            Some(SignalTier::Balanced)
        } else if confidence >= 0.75 {
            Some(SignalTier::Aggressive)
        } else {
            None
        }
    }
}

/// Read-only hint from a correlated symbol's machine, passed by value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeerHint {
    pub state: PhaseState,
    pub confidence: f64,
}

/// Output of the phase machine at the terminal transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSignal {
    pub symbol: String,
    pub direction: SignalDirection,
    /// Total confirmation confidence in [0, 1].
    pub confidence: f64,
    pub tier: SignalTier,
    pub entry_price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Per-layer score breakdown, exposed for inspection and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerScores {
    pub book_refill: f64,
    pub flow_flip: f64,
    pub volume_spike: f64,
    pub spread_tightening: f64,
    pub price_wick: f64,
    pub mtf_support: f64,
    pub liquidation_cascade: f64,
    pub pressure_acceleration: f64,
    pub volume_profile_exhaustion: f64,
    pub toxicity_flip: f64,
    pub peer_lead: f64,
    pub penalties: f64,
}

impl LayerScores {
    pub fn total(&self) -> f64 {
        (BASE_CONFIDENCE
            + self.book_refill
            + self.flow_flip
            + self.volume_spike
            + self.spread_tightening
            + self.price_wick
            + self.mtf_support
            + self.liquidation_cascade
            + self.pressure_acceleration
            + self.volume_profile_exhaustion
            + self.toxicity_flip
            + self.peer_lead
            - self.penalties)
            .clamp(0.0, 1.0)
    }
}

pub struct PhaseStateMachine {
    symbol: String,
    state: PhaseState,
    entered_at: Option<DateTime<Utc>>,
    entry_price: Option<f64>,
    /// Trade direction for the current episode (Long after a selloff).
    direction: Option<SignalDirection>,
    history: MetricHistory,
    /// Running extreme against the move (low for selloff, high for rally).
    extreme_price: f64,
    /// Running minimum depth on the beaten side during the episode.
    min_depth: f64,
    /// Widest spread seen during the episode.
    max_spread: f64,
    episode_samples: usize,
}

impl PhaseStateMachine {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: PhaseState::Normal,
            entered_at: None,
            entry_price: None,
            direction: None,
            history: MetricHistory::new(PHASE_HISTORY),
            extreme_price: 0.0,
            min_depth: f64::MAX,
            max_spread: 0.0,
            episode_samples: 0,
        }
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn direction(&self) -> Option<SignalDirection> {
        self.direction
    }

    /// Re-arm the machine after a reversal has been traded or abandoned.
    pub fn reset(&mut self) {
        self.state = PhaseState::Normal;
        self.entered_at = None;
        self.entry_price = None;
        self.direction = None;
        self.history = MetricHistory::new(PHASE_HISTORY);
        self.extreme_price = 0.0;
        self.min_depth = f64::MAX;
        self.max_spread = 0.0;
        self.episode_samples = 0;
    }

    /// Feed one snapshot; emits at most once per episode, at the
    /// capitulation-to-reversal transition.
    pub fn update(
        &mut self,
        snapshot: &MarketSnapshot,
        peer: Option<PeerHint>,
    ) -> Option<PhaseSignal> {
        self.history.record(snapshot);
        let price = snapshot.mid_price();

        match self.state {
            PhaseState::Normal => {
                if snapshot.spread_pct > SPREAD_ENTER {
                    if snapshot.imbalance < -SKEW_ENTER {
                        self.arm_episode(snapshot, SignalDirection::Long, PhaseState::Selloff);
                    } else if snapshot.imbalance > SKEW_ENTER {
                        self.arm_episode(snapshot, SignalDirection::Short, PhaseState::Rally);
                    }
                }
                None
            }
            PhaseState::Selloff | PhaseState::Rally => {
                let beaten_depth = self.beaten_side_depth(snapshot);
                let collapsed = snapshot.spread_pct > SPREAD_BLOWOUT
                    && beaten_depth < self.min_depth * DEPTH_COLLAPSE_FACTOR;
                self.track_episode(snapshot, price);
                if collapsed {
                    self.state = match self.state {
                        PhaseState::Selloff => PhaseState::Capitulation,
                        _ => PhaseState::RallyExhaustion,
                    };
                    self.entered_at = Some(snapshot.timestamp);
                    debug!(
                        symbol = %self.symbol,
                        state = ?self.state,
                        price,
                        "phase transition"
                    );
                }
                None
            }
            PhaseState::Capitulation | PhaseState::RallyExhaustion => {
                self.track_episode(snapshot, price);
                self.score_and_maybe_emit(snapshot, peer)
            }
            // Terminal until reset.
            PhaseState::Reversal => None,
        }
    }

    fn arm_episode(
        &mut self,
        snapshot: &MarketSnapshot,
        direction: SignalDirection,
        state: PhaseState,
    ) {
        self.state = state;
        self.direction = Some(direction);
        self.entered_at = Some(snapshot.timestamp);
        self.entry_price = Some(snapshot.mid_price());
        self.extreme_price = snapshot.mid_price();
        self.min_depth = self.beaten_side_depth(snapshot);
        self.max_spread = snapshot.spread_pct;
        self.episode_samples = 1;
        debug!(
            symbol = %self.symbol,
            state = ?self.state,
            imbalance = snapshot.imbalance,
            spread = snapshot.spread_pct,
            "episode armed"
        );
    }

    /// Depth on the side the move is eating through: bids in a selloff,
    /// asks in a rally.
    fn beaten_side_depth(&self, snapshot: &MarketSnapshot) -> f64 {
        match self.direction {
            Some(SignalDirection::Short) => snapshot.ask_depth,
            _ => snapshot.bid_depth,
        }
    }

    fn track_episode(&mut self, snapshot: &MarketSnapshot, price: f64) {
        match self.direction {
            Some(SignalDirection::Long) => self.extreme_price = self.extreme_price.min(price),
            Some(SignalDirection::Short) => self.extreme_price = self.extreme_price.max(price),
            None => {}
        }
        let depth = self.beaten_side_depth(snapshot);
        self.min_depth = self.min_depth.min(depth);
        self.max_spread = self.max_spread.max(snapshot.spread_pct);
        self.episode_samples += 1;
    }

    fn score_and_maybe_emit(
        &mut self,
        snapshot: &MarketSnapshot,
        peer: Option<PeerHint>,
    ) -> Option<PhaseSignal> {
        let direction = self.direction?;
        let windows = if self.history.len() >= MIN_LAYER_SAMPLES {
            self.history.window_set(self.history.len().min(PHASE_HISTORY)).ok()
        } else {
            None
        };
        let ctx = LayerContext {
            snapshot,
            windows: windows.as_ref(),
            direction,
            extreme_price: self.extreme_price,
            min_depth: self.min_depth,
            max_spread: self.max_spread,
            peer,
        };
        let scores = layers::score_all(&ctx);
        let confidence = scores.total();

        let tier = SignalTier::for_confidence(confidence)?;
        self.state = PhaseState::Reversal;
        let signal = PhaseSignal {
            symbol: self.symbol.clone(),
            direction,
            confidence,
            tier,
            entry_price: snapshot.mid_price(),
            timestamp: snapshot.timestamp,
        };
        info!(
            symbol = %self.symbol,
            direction = ?signal.direction,
            confidence = signal.confidence,
            tier = ?signal.tier,
            "phase reversal signal emitted"
        );
        Some(signal)
    }
}
