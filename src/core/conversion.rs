//! Applying a resolved rate to an amount.

use chrono::{DateTime, Local};
use tracing::{debug, instrument};

use super::currency::CurrencyRateProvider;
use super::error::ConvertError;

#[derive(Debug, Clone)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub converted: f64,
    pub resolved_at: DateTime<Local>,
}

impl Conversion {
    /// e.g. `100 USD = 92.00 EUR`
    pub fn summary(&self) -> String {
        format!(
            "{} {} = {:.2} {}",
            self.amount, self.from, self.converted, self.to
        )
    }

    /// e.g. `1 USD = 0.9200 EUR • Updated: 14:03:11`
    pub fn rate_info(&self) -> String {
        format!(
            "1 {} = {:.4} {} • Updated: {}",
            self.from,
            self.rate,
            self.to,
            self.resolved_at.format("%H:%M:%S")
        )
    }
}

/// Converts `amount` of `from` into `to`.
///
/// Equal currencies short-circuit to a rate of 1.0 without consulting the
/// provider.
#[instrument(skip(provider))]
pub async fn convert(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    amount: f64,
    from: &str,
    to: &str,
) -> Result<Conversion, ConvertError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ConvertError::InvalidAmount(amount));
    }
    if from.is_empty() || to.is_empty() {
        return Err(ConvertError::EmptyCurrency);
    }

    let rate = if from == to {
        debug!("Same currency, skipping rate lookup");
        1.0
    } else {
        provider.get_rate(from, to).await?
    };

    Ok(Conversion {
        amount,
        from: from.to_string(),
        to: to.to_string(),
        rate,
        converted: amount * rate,
        resolved_at: Local::now(),
    })
}
