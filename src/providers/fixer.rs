use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use super::util::{extract_rate, http_client};
use crate::core::currency::{PairKey, RateSource};

/// Pair lookup with explicit query parameters:
/// `GET {base_url}/latest?base={base}&symbols={target}`.
pub struct FixerSource {
    base_url: String,
    access_key: Option<String>,
    client: reqwest::Client,
}

impl FixerSource {
    pub fn new(base_url: &str, access_key: Option<String>) -> Result<Self> {
        Ok(FixerSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            client: http_client()?,
        })
    }

    fn request_url(&self, base: &str, target: &str) -> Result<Url> {
        let mut params = vec![("base", base), ("symbols", target)];
        if let Some(key) = &self.access_key {
            params.push(("access_key", key.as_str()));
        }

        let endpoint = format!("{}/latest", self.base_url);
        Url::parse_with_params(&endpoint, &params)
            .with_context(|| format!("Invalid fixer endpoint: {endpoint}"))
    }
}

#[async_trait]
impl RateSource for FixerSource {
    fn name(&self) -> &str {
        "fixer"
    }

    #[instrument(name = "FixerFetch", skip(self), fields(base = %base, target = %target))]
    async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64> {
        let pair = PairKey::new(base, target);
        let url = self.request_url(base, target)?;
        // Avoid logging the access key
        debug!("Requesting rate from {}{}", self.base_url, url.path());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        extract_rate(response, target, pair.as_str()).await
    }
}
