//! Provider-fed confirmation checks.
//!
//! These read pre-cached enrichment values (funding rate, liquidity
//! asymmetry) instead of windowed history, so their strength is the value
//! scaled by its threshold, capped to keep the SNR contribution bounded.

use crate::models::{CheckKind, CheckResult, PriceDirection};

const EXTERNAL_STRENGTH_CAP: f64 = 3.0;

/// Fires when funding is crowded on the side of the price move: longs
/// paying into a rally or shorts paying into a selloff set up the squeeze
/// the contrarian signal trades.
pub fn funding_divergence(
    funding_rate: f64,
    direction: PriceDirection,
    threshold: f64,
) -> CheckResult {
    if funding_rate * direction.sign() > threshold {
        let strength = (funding_rate.abs() / threshold).min(EXTERNAL_STRENGTH_CAP);
        CheckResult::fired(CheckKind::FundingDivergence, strength)
    } else {
        CheckResult::quiet(CheckKind::FundingDivergence)
    }
}

/// Fires when quoted liquidity is skewed toward the contrarian side
/// (positive asymmetry = bid-heavy). A falling market with bid-heavy
/// liquidity confirms the long case, and mirrored for shorts.
pub fn liquidity_asymmetry(
    asymmetry: f64,
    direction: PriceDirection,
    threshold: f64,
) -> CheckResult {
    if asymmetry * direction.sign() < -threshold {
        let strength = (asymmetry.abs() / threshold).min(EXTERNAL_STRENGTH_CAP);
        CheckResult::fired(CheckKind::LiquidityAsymmetry, strength)
    } else {
        CheckResult::quiet(CheckKind::LiquidityAsymmetry)
    }
}
