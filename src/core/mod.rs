//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use conversion::{Conversion, convert};
pub use currency::{CurrencyRateProvider, PairKey, RateSource};
pub use error::{ConvertError, RateUnavailable};
