//! Wave-structure regime classification.
//!
//! Price ticks are grouped into directional waves; a wave closes when price
//! retraces beyond a threshold from its running extreme. Closed waves feed a
//! structural trend read (higher-highs/higher-lows vs the mirror) and a
//! volume bias, which combine into the bias used by the detector's veto.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Closed waves kept for structure analysis.
const WAVE_HISTORY: usize = 10;
/// Waves per direction required before a trend call.
const MIN_WAVES_PER_SIDE: usize = 2;
/// Volume differential that breaks a tie.
const VOLUME_BIAS_RATIO: f64 = 0.05;
/// Volume differential that counts as strong disagreement with structure.
const VOLUME_STRONG_RATIO: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveKind {
    Up,
    Down,
}

/// A wave still being extended by new ticks.
#[derive(Debug, Clone)]
struct OpenWave {
    kind: WaveKind,
    start_price: f64,
    extreme_price: f64,
    volume: f64,
    ticks: usize,
    started_at: DateTime<Utc>,
}

/// Archived record of a completed directional excursion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedWave {
    pub kind: WaveKind,
    pub start_price: f64,
    pub end_price: f64,
    pub total_volume: f64,
    pub avg_volume: f64,
    pub ticks: usize,
    pub duration_secs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TrendBias {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendBias {
    pub fn opposes(self, direction: crate::models::SignalDirection) -> bool {
        use crate::models::SignalDirection::*;
        matches!(
            (self, direction),
            (TrendBias::Bearish, Long) | (TrendBias::Bullish, Short)
        )
    }
}

/// Structural read from the last two peaks and troughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StructureBias {
    /// Higher high and higher low agree.
    StronglyBullish,
    /// Lower high and lower low agree.
    StronglyBearish,
    /// Peaks and troughs disagree.
    Mixed,
}

/// Read-only derived snapshot of the current regime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendState {
    pub bias: TrendBias,
    pub structure: StructureBias,
    pub volume_bias: TrendBias,
}

/// Tick-driven FLAT/UP/DOWN wave machine with bounded history.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    retrace_pct: f64,
    current: Option<OpenWave>,
    history: VecDeque<ClosedWave>,
}

impl RegimeClassifier {
    pub fn new(retrace_pct: f64) -> Self {
        Self {
            retrace_pct,
            current: None,
            history: VecDeque::with_capacity(WAVE_HISTORY),
        }
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.history.clear();
    }

    /// Feed one tick. Opens, extends, or closes waves.
    pub fn on_tick(&mut self, price: f64, volume: f64, ts: DateTime<Utc>) {
        let Some(wave) = self.current.as_mut() else {
            // First tick only anchors the start; direction comes from the
            // next move.
            self.current = Some(OpenWave {
                kind: WaveKind::Up,
                start_price: price,
                extreme_price: price,
                volume,
                ticks: 1,
                started_at: ts,
            });
            return;
        };

        // Re-derive the direction while the wave is still at its anchor.
        if wave.ticks == 1 && price != wave.start_price {
            wave.kind = if price > wave.start_price {
                WaveKind::Up
            } else {
                WaveKind::Down
            };
        }

        let extending = match wave.kind {
            WaveKind::Up => price >= wave.extreme_price,
            WaveKind::Down => price <= wave.extreme_price,
        };
        if extending {
            wave.extreme_price = price;
            wave.volume += volume;
            wave.ticks += 1;
            return;
        }

        let retrace = (price - wave.extreme_price).abs() / wave.extreme_price * 100.0;
        if retrace < self.retrace_pct {
            // Noise inside the wave.
            wave.volume += volume;
            wave.ticks += 1;
            return;
        }

        // Retracement beyond threshold: close the wave and open the mirror.
        let closed = ClosedWave {
            kind: wave.kind,
            start_price: wave.start_price,
            end_price: wave.extreme_price,
            total_volume: wave.volume,
            avg_volume: wave.volume / wave.ticks.max(1) as f64,
            ticks: wave.ticks,
            duration_secs: (ts - wave.started_at).num_seconds(),
        };
        let next = OpenWave {
            kind: match wave.kind {
                WaveKind::Up => WaveKind::Down,
                WaveKind::Down => WaveKind::Up,
            },
            start_price: wave.extreme_price,
            extreme_price: price,
            volume,
            ticks: 1,
            started_at: ts,
        };
        if self.history.len() == WAVE_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(closed);
        self.current = Some(next);
    }

    pub fn closed_waves(&self) -> impl Iterator<Item = &ClosedWave> {
        self.history.iter()
    }

    /// Classify the current trend. Needs at least two closed waves per
    /// direction; otherwise everything reads Neutral/Mixed.
    pub fn trend_state(&self) -> TrendState {
        let ups: Vec<&ClosedWave> = self
            .history
            .iter()
            .filter(|w| w.kind == WaveKind::Up)
            .collect();
        let downs: Vec<&ClosedWave> = self
            .history
            .iter()
            .filter(|w| w.kind == WaveKind::Down)
            .collect();

        if ups.len() < MIN_WAVES_PER_SIDE || downs.len() < MIN_WAVES_PER_SIDE {
            return TrendState {
                bias: TrendBias::Neutral,
                structure: StructureBias::Mixed,
                volume_bias: TrendBias::Neutral,
            };
        }

        let (volume_bias, volume_strong) = Self::volume_bias(&ups, &downs);
        let structure = Self::structure_bias(&ups, &downs);

        // Structure wins unless volume strongly disagrees; mixed structure
        // falls back to the volume read.
        let bias = match structure {
            StructureBias::StronglyBullish => {
                if volume_strong && volume_bias == TrendBias::Bearish {
                    volume_bias
                } else {
                    TrendBias::Bullish
                }
            }
            StructureBias::StronglyBearish => {
                if volume_strong && volume_bias == TrendBias::Bullish {
                    volume_bias
                } else {
                    TrendBias::Bearish
                }
            }
            StructureBias::Mixed => volume_bias,
        };

        TrendState {
            bias,
            structure,
            volume_bias,
        }
    }

    fn volume_bias(ups: &[&ClosedWave], downs: &[&ClosedWave]) -> (TrendBias, bool) {
        let up_avg =
            ups.iter().map(|w| w.avg_volume).sum::<f64>() / ups.len() as f64;
        let down_avg =
            downs.iter().map(|w| w.avg_volume).sum::<f64>() / downs.len() as f64;
        let base = up_avg.max(down_avg);
        if base <= 0.0 {
            return (TrendBias::Neutral, false);
        }
        let diff = (up_avg - down_avg) / base;
        let bias = if diff > VOLUME_BIAS_RATIO {
            TrendBias::Bullish
        } else if diff < -VOLUME_BIAS_RATIO {
            TrendBias::Bearish
        } else {
            TrendBias::Neutral
        };
        (bias, diff.abs() > VOLUME_STRONG_RATIO)
    }

    fn structure_bias(ups: &[&ClosedWave], downs: &[&ClosedWave]) -> StructureBias {
        // Peaks are the extremes of up waves, troughs of down waves.
        let peak_prev = ups[ups.len() - 2].end_price;
        let peak_last = ups[ups.len() - 1].end_price;
        let trough_prev = downs[downs.len() - 2].end_price;
        let trough_last = downs[downs.len() - 1].end_price;

        let higher_high = peak_last > peak_prev;
        let higher_low = trough_last > trough_prev;
        if higher_high && higher_low {
            StructureBias::StronglyBullish
        } else if !higher_high && !higher_low {
            StructureBias::StronglyBearish
        } else {
            StructureBias::Mixed
        }
    }
}
