//! Currency rate abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Display;

use super::error::RateUnavailable;

/// Cache key for an ordered currency pair. `USD_EUR` and `EUR_USD` are
/// distinct since rates are directional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(from: &str, to: &str) -> Self {
        PairKey(format!("{from}_{to}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single upstream service able to quote `base -> target`.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64>;
}

/// Resolves a rate for an ordered currency pair.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateUnavailable>;
}
