//! Enrichment provider interface.
//!
//! Funding rates and liquidity asymmetry come from periodic-refresh
//! collaborators outside the engine. The detector only reads their cached
//! values through this trait, so `update()` never blocks; a `None` simply
//! makes the dependent check abstain.

/// Non-blocking reads of externally refreshed market context.
pub trait EnrichmentProvider: Send {
    /// Latest cached funding rate for the symbol, if any.
    fn funding_rate(&self, symbol: &str) -> Option<f64>;

    /// Latest cached liquidity asymmetry in [-1, 1] (positive = bid-heavy),
    /// if any.
    fn liquidity_asymmetry(&self, symbol: &str) -> Option<f64>;
}

/// Provider that has nothing cached. Useful as a default and in tests.
pub struct NoEnrichment;

impl EnrichmentProvider for NoEnrichment {
    fn funding_rate(&self, _symbol: &str) -> Option<f64> {
        None
    }

    fn liquidity_asymmetry(&self, _symbol: &str) -> Option<f64> {
        None
    }
}

/// Fixed values, for tests and replay harnesses.
#[derive(Debug, Clone, Default)]
pub struct StaticEnrichment {
    pub funding_rate: Option<f64>,
    pub liquidity_asymmetry: Option<f64>,
}

impl EnrichmentProvider for StaticEnrichment {
    fn funding_rate(&self, _symbol: &str) -> Option<f64> {
        self.funding_rate
    }

    fn liquidity_asymmetry(&self, _symbol: &str) -> Option<f64> {
        self.liquidity_asymmetry
    }
}
