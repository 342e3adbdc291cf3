pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: Vec<String>,
    },
    Rate {
        from: String,
        to: String,
    },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load_or_default(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    // The cache lives as long as this provider
    let rate_cache = Arc::new(RateCache::with_ttl(config.cache.ttl()));
    let provider = providers::build_provider(&config, Arc::clone(&rate_cache))?;

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run_convert(&provider, amount, &from, &to).await
        }
        AppCommand::Rate { from, to } => cli::convert::run_rate(&provider, &from, &to).await,
    }
}
