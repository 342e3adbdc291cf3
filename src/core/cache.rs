use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use super::currency::PairKey;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub rate: f64,
    pub fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// In-memory rate cache keyed by currency pair.
///
/// Stale entries are never purged; they are skipped on read and overwritten by
/// the next successful fetch. The cache lives as long as its owner holds it.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<Mutex<HashMap<PairKey, CacheEntry>>>,
    ttl: Duration,
}

impl RateCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached rate if the entry is younger than the TTL.
    pub async fn get(&self, key: &PairKey) -> Option<f64> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => {
                debug!("Cache HIT for key: {}", key);
                Some(entry.rate)
            }
            Some(_) => {
                debug!("Cache entry expired for key: {}", key);
                None
            }
            None => {
                debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Raw entry lookup, ignoring freshness.
    pub async fn entry(&self, key: &PairKey) -> Option<CacheEntry> {
        self.inner.lock().await.get(key).copied()
    }

    pub async fn put(&self, key: PairKey, rate: f64) {
        let entry = CacheEntry {
            rate,
            fetched_at: Instant::now(),
        };

        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {}", key);
        cache.insert(key, entry);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
