use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const USER_AGENT: &str = "xconv/1.0";

/// Rate table body shared by the supported services: `{"rates": {"EUR": 0.92}}`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<HashMap<String, Value>>,
}

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Checks the status of `response`, parses the rate table and extracts a
/// positive rate for `target`. `pair` only labels error messages.
pub async fn extract_rate(response: reqwest::Response, target: &str, pair: &str) -> Result<f64> {
    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP error: {} for currency pair: {}",
            response.status(),
            pair
        ));
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body for {pair}"))?;

    let data: RatesResponse = serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;

    let rate = data
        .rates
        .as_ref()
        .and_then(|rates| rates.get(target))
        .and_then(Value::as_f64)
        .ok_or_else(|| anyhow!("Currency not found in response for pair: {}", pair))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(anyhow!("Invalid rate {} for currency pair: {}", rate, pair));
    }

    debug!(pair, rate, "Extracted rate from response");
    Ok(rate)
}
