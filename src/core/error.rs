//! Error types surfaced by rate resolution and conversion.

use thiserror::Error;

/// No configured source could supply a rate for the pair.
///
/// Every underlying failure (transport, HTTP status, malformed body, missing
/// currency) collapses into this one kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to fetch exchange rate for {from} -> {to}")]
pub struct RateUnavailable {
    pub from: String,
    pub to: String,
}

impl RateUnavailable {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Errors from applying a rate to an amount.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("Enter a valid amount: {0}")]
    InvalidAmount(f64),

    #[error("Currency code must not be empty")]
    EmptyCurrency,

    #[error(transparent)]
    RateUnavailable(#[from] RateUnavailable),
}
