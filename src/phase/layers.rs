//! Confirmation layers scored while the machine sits in capitulation or
//! rally-exhaustion. Every layer's contribution is bounded; window-based
//! layers score zero until enough episode history exists.

use super::{LayerScores, PeerHint, PhaseState};
use crate::models::{MarketSnapshot, SignalDirection};
use crate::series::WindowSet;
use crate::stats;

// Per-layer contribution caps.
const W_BOOK_REFILL: f64 = 0.10;
const W_FLOW_FLIP: f64 = 0.08;
const W_VOLUME_SPIKE: f64 = 0.06;
const W_SPREAD_TIGHTENING: f64 = 0.05;
const W_PRICE_WICK: f64 = 0.05;
const W_MTF_SUPPORT: f64 = 0.04;
const W_LIQUIDATION_CASCADE: f64 = 0.04;
const W_PRESSURE_ACCEL: f64 = 0.03;
const W_VOLUME_PROFILE: f64 = 0.03;
const W_TOXICITY_FLIP: f64 = 0.02;
const W_PEER_LEAD: f64 = 0.05;

// Penalty filters.
const PENALTY_WEAK_RECOVERY: f64 = 0.05;
const PENALTY_WIDE_SPREAD: f64 = 0.05;
/// Price recovery off the extreme below this fraction is "weak".
const WEAK_RECOVERY_FRACTION: f64 = 0.0005; // 0.05%
/// Spread (pct) above this still counts as blown out.
const SPREAD_STILL_WIDE: f64 = 0.15;

/// Everything a layer may read. Windows are the episode's own history and
/// may be absent early in an episode.
pub struct LayerContext<'a> {
    pub snapshot: &'a MarketSnapshot,
    pub windows: Option<&'a WindowSet>,
    pub direction: SignalDirection,
    pub extreme_price: f64,
    pub min_depth: f64,
    pub max_spread: f64,
    pub peer: Option<PeerHint>,
}

impl LayerContext<'_> {
    /// +1 when the trade wants rising prices/imbalance, -1 mirrored.
    fn favor(&self) -> f64 {
        match self.direction {
            SignalDirection::Long => 1.0,
            SignalDirection::Short => -1.0,
        }
    }

    /// Fractional price recovery off the episode extreme, >= 0.
    fn recovery_fraction(&self) -> f64 {
        if self.extreme_price == 0.0 {
            return 0.0;
        }
        let price = self.snapshot.mid_price();
        ((price - self.extreme_price) / self.extreme_price * self.favor()).max(0.0)
    }

    fn beaten_depth(&self) -> f64 {
        match self.direction {
            SignalDirection::Long => self.snapshot.bid_depth,
            SignalDirection::Short => self.snapshot.ask_depth,
        }
    }
}

pub fn score_all(ctx: &LayerContext<'_>) -> LayerScores {
    let flow_flip = flow_flip(ctx);
    let spread_tightening = spread_tightening(ctx);
    LayerScores {
        book_refill: book_refill(ctx),
        flow_flip,
        volume_spike: volume_spike(ctx),
        spread_tightening,
        price_wick: price_wick(ctx),
        mtf_support: mtf_support(ctx),
        liquidation_cascade: liquidation_cascade(ctx),
        pressure_acceleration: pressure_acceleration(ctx),
        volume_profile_exhaustion: volume_profile_exhaustion(ctx),
        toxicity_flip: toxicity_flip(flow_flip, spread_tightening),
        peer_lead: peer_lead(ctx),
        penalties: penalties(ctx),
    }
}

/// Depth on the beaten side recovering off its episode minimum.
fn book_refill(ctx: &LayerContext<'_>) -> f64 {
    if ctx.min_depth <= 0.0 || ctx.min_depth == f64::MAX {
        return 0.0;
    }
    let ratio = ctx.beaten_depth() / ctx.min_depth;
    ((ratio - 1.0).clamp(0.0, 0.5) / 0.5) * W_BOOK_REFILL
}

/// Order-flow-imbalance proxy flipping toward the trade direction.
fn flow_flip(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let (_, recent) = stats::split_window(&windows.imbalance);
    let flip = stats::mean(recent) * ctx.favor();
    (flip.clamp(0.0, 0.4) / 0.4) * W_FLOW_FLIP
}

/// Last interval's volume spiking above the trailing average.
fn volume_spike(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let n = windows.volume.len();
    if n < 2 {
        return 0.0;
    }
    let trailing = stats::mean(&windows.volume[..n - 1]);
    if trailing <= 0.0 {
        return 0.0;
    }
    let ratio = windows.volume[n - 1] / trailing;
    ((ratio - 1.5).clamp(0.0, 1.5) / 1.5) * W_VOLUME_SPIKE
}

/// Market makers pulling the spread back in from the blowout.
fn spread_tightening(ctx: &LayerContext<'_>) -> f64 {
    if ctx.max_spread <= 0.0 {
        return 0.0;
    }
    let tightening = 1.0 - ctx.snapshot.spread_pct / ctx.max_spread;
    (tightening.clamp(0.0, 0.6) / 0.6) * W_SPREAD_TIGHTENING
}

/// Price rejecting the extreme: a wick off the low (or high).
fn price_wick(ctx: &LayerContext<'_>) -> f64 {
    (ctx.recovery_fraction().clamp(0.0, 0.003) / 0.003) * W_PRICE_WICK
}

/// Short and medium momentum both turned toward the trade.
fn mtf_support(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let prices = &windows.price;
    let n = prices.len();
    if n < 15 {
        return 0.0;
    }
    let slope = |span: usize| -> f64 {
        let tail = &prices[n - span..];
        (tail[span - 1] - tail[0]) * ctx.favor()
    };
    let mut score = 0.0;
    if slope(5) > 0.0 {
        score += W_MTF_SUPPORT / 2.0;
    }
    if slope(15) > 0.0 {
        score += W_MTF_SUPPORT / 2.0;
    }
    score
}

/// Volume crescendo followed by collapse, the liquidation-cascade shape.
fn liquidation_cascade(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let vols = &windows.volume;
    let peak = vols.iter().cloned().fold(0.0_f64, f64::max);
    let avg = stats::mean(vols);
    let last = *vols.last().unwrap_or(&0.0);
    if peak <= 0.0 || avg <= 0.0 || peak < 2.0 * avg {
        return 0.0;
    }
    let collapse = (1.0 - last / peak).clamp(0.0, 1.0);
    collapse * W_LIQUIDATION_CASCADE
}

/// Imbalance shift accelerating toward the flip across window thirds.
fn pressure_acceleration(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let imb = &windows.imbalance;
    let third = imb.len() / 3;
    if third == 0 {
        return 0.0;
    }
    let first = stats::mean(&imb[..third]);
    let mid = stats::mean(&imb[third..2 * third]);
    let last = stats::mean(&imb[2 * third..]);
    let accel = ((last - mid) - (mid - first)) * ctx.favor();
    (accel.clamp(0.0, 0.2) / 0.2) * W_PRESSURE_ACCEL
}

/// Volume tapering off after the cascade peak: the exhaustion shape.
fn volume_profile_exhaustion(ctx: &LayerContext<'_>) -> f64 {
    let Some(windows) = ctx.windows else {
        return 0.0;
    };
    let vols = &windows.volume;
    let n = vols.len();
    if n < 4 {
        return 0.0;
    }
    let descending = vols[n - 3] > vols[n - 2] && vols[n - 2] > vols[n - 1];
    let peak = vols.iter().cloned().fold(0.0_f64, f64::max);
    let avg = stats::mean(vols);
    if descending && avg > 0.0 && peak > 1.5 * avg {
        W_VOLUME_PROFILE
    } else {
        0.0
    }
}

/// Flow toxicity easing: composite of the flip and tightening layers both
/// showing up at once.
fn toxicity_flip(flow_flip: f64, spread_tightening: f64) -> f64 {
    if flow_flip <= 0.0 || spread_tightening <= 0.0 {
        return 0.0;
    }
    let blend = (flow_flip / W_FLOW_FLIP + spread_tightening / W_SPREAD_TIGHTENING) / 2.0;
    blend.clamp(0.0, 1.0) * W_TOXICITY_FLIP
}

/// A correlated asset's machine already confirming the turn.
fn peer_lead(ctx: &LayerContext<'_>) -> f64 {
    let Some(peer) = ctx.peer else {
        return 0.0;
    };
    let leading = matches!(
        peer.state,
        PhaseState::Reversal | PhaseState::Capitulation | PhaseState::RallyExhaustion
    );
    if !leading {
        return 0.0;
    }
    if peer.confidence >= 0.8 {
        W_PEER_LEAD
    } else if peer.confidence >= 0.6 {
        W_PEER_LEAD / 2.0
    } else {
        0.0
    }
}

/// Penalty filters: weak price recovery or a spread still blown out both
/// argue the knife is still falling.
fn penalties(ctx: &LayerContext<'_>) -> f64 {
    let mut p = 0.0;
    if ctx.recovery_fraction() < WEAK_RECOVERY_FRACTION {
        p += PENALTY_WEAK_RECOVERY;
    }
    if ctx.snapshot.spread_pct > SPREAD_STILL_WIDE {
        p += PENALTY_WIDE_SPREAD;
    }
    p
}
