use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::cache::RateCache;
use crate::core::currency::{CurrencyRateProvider, PairKey, RateSource};
use crate::core::error::RateUnavailable;

/// Resolves rates through a shared cache and an ordered list of sources.
///
/// The first source is the primary; the rest are consulted in order only when
/// every earlier one failed. A successful fetch overwrites the cache entry for
/// the pair; a failed one leaves the cache untouched. Concurrent callers for
/// the same pair wait on a per-pair gate so only one of them hits the network.
pub struct FallbackRateProvider {
    sources: Vec<Arc<dyn RateSource>>,
    cache: Arc<RateCache>,
    in_flight: Mutex<HashMap<PairKey, Arc<Mutex<()>>>>,
}

impl FallbackRateProvider {
    pub fn new(sources: Vec<Arc<dyn RateSource>>, cache: Arc<RateCache>) -> Self {
        Self {
            sources,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    async fn gate_for(&self, key: &PairKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        Arc::clone(in_flight.entry(key.clone()).or_default())
    }

    async fn release_gate(&self, key: &PairKey, gate: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // Only the map and the caller hold it: nobody else is waiting
        if Arc::strong_count(gate) <= 2 {
            in_flight.remove(key);
        }
    }

    async fn fetch_from_sources(&self, from: &str, to: &str) -> Option<f64> {
        for source in &self.sources {
            match source.fetch_rate(from, to).await {
                Ok(rate) => {
                    debug!(source = source.name(), from, to, rate, "Got rate from source");
                    return Some(rate);
                }
                Err(e) => {
                    warn!(
                        source = source.name(),
                        from,
                        to,
                        error = %e,
                        "Source failed to return rate"
                    );
                }
            }
        }
        None
    }
}

#[async_trait]
impl CurrencyRateProvider for FallbackRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateUnavailable> {
        if from == to {
            return Ok(1.0);
        }

        let key = PairKey::new(from, to);
        if let Some(rate) = self.cache.get(&key).await {
            return Ok(rate);
        }

        let gate = self.gate_for(&key).await;
        let guard = gate.lock().await;

        // Another caller may have filled the entry while we waited
        let result = match self.cache.get(&key).await {
            Some(rate) => Some(rate),
            None => {
                let fetched = self.fetch_from_sources(from, to).await;
                if let Some(rate) = fetched {
                    self.cache.put(key.clone(), rate).await;
                }
                fetched
            }
        };

        self.release_gate(&key, &gate).await;
        drop(guard);

        result.ok_or_else(|| RateUnavailable::new(from, to))
    }
}
