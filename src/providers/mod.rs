pub mod exchangerate_api;
pub mod fallback;
pub mod fixer;
pub mod util;

use anyhow::Result;
use std::sync::Arc;

use crate::core::cache::RateCache;
use crate::core::config::{AppConfig, SourceConfig};
use crate::core::currency::RateSource;
use exchangerate_api::ExchangerateApiSource;
use fallback::FallbackRateProvider;
use fixer::FixerSource;

/// Instantiates the configured sources, preserving their order.
pub fn build_sources(configs: &[SourceConfig]) -> Result<Vec<Arc<dyn RateSource>>> {
    configs
        .iter()
        .map(|config| -> Result<Arc<dyn RateSource>> {
            let source: Arc<dyn RateSource> = match config {
                SourceConfig::ExchangerateApi { base_url } => {
                    Arc::new(ExchangerateApiSource::new(base_url)?)
                }
                SourceConfig::Fixer {
                    base_url,
                    access_key,
                } => Arc::new(FixerSource::new(base_url, access_key.clone())?),
            };
            Ok(source)
        })
        .collect()
}

pub fn build_provider(config: &AppConfig, cache: Arc<RateCache>) -> Result<FallbackRateProvider> {
    let sources = build_sources(&config.sources)?;
    Ok(FallbackRateProvider::new(sources, cache))
}
