use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::util::{extract_rate, http_client};
use crate::core::currency::{PairKey, RateSource};

/// Rate table anchored at a base currency: `GET {base_url}/v4/latest/{base}`.
pub struct ExchangerateApiSource {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangerateApiSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ExchangerateApiSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl RateSource for ExchangerateApiSource {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(name = "ExchangerateApiFetch", skip(self), fields(base = %base, target = %target))]
    async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64> {
        let pair = PairKey::new(base, target);
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting rate table from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        extract_rate(response, target, pair.as_str()).await
    }
}
