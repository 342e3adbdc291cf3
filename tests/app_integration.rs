use std::fs;
use std::sync::Arc;
use tracing::{error, info};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xconv::core::cache::RateCache;
use xconv::core::config::{AppConfig, CacheConfig, SourceConfig};
use xconv::core::currency::{CurrencyRateProvider, PairKey};
use xconv::core::error::RateUnavailable;
use xconv::providers::build_provider;

mod test_utils {
    use super::*;

    pub async fn mount_primary(server: &MockServer, base: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/v4/latest/{base}")))
            .respond_with(response)
            .mount(server)
            .await;
    }

    pub async fn mount_secondary(server: &MockServer, base: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", base))
            .respond_with(response)
            .mount(server)
            .await;
    }

    pub fn config(primary_url: &str, secondary_url: &str, ttl_secs: u64) -> AppConfig {
        AppConfig {
            sources: vec![
                SourceConfig::ExchangerateApi {
                    base_url: primary_url.to_string(),
                },
                SourceConfig::Fixer {
                    base_url: secondary_url.to_string(),
                    access_key: None,
                },
            ],
            cache: CacheConfig { ttl_secs },
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_primary_rate_and_cache_hit() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.92}}"#))
        .expect(1)
        .mount(&primary)
        .await;

    let config = test_utils::config(&primary.uri(), &secondary.uri(), 60);
    let cache = Arc::new(RateCache::with_ttl(config.cache.ttl()));
    let provider = build_provider(&config, Arc::clone(&cache)).unwrap();

    let rate = provider.get_rate("USD", "EUR").await.unwrap();
    assert_eq!(rate, 0.92);
    assert!((100.0 * rate - 92.0).abs() < 1e-9);

    // Served from cache, the mock expects exactly one request
    assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.92);
    assert_eq!(cache.len().await, 1);
    assert!(secondary.received_requests().await.unwrap_or_default().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_fallback_after_primary_server_error() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_primary(&primary, "USD", ResponseTemplate::new(500)).await;
    test_utils::mount_secondary(
        &secondary,
        "USD",
        ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.93}}"#),
    )
    .await;

    let config = test_utils::config(&primary.uri(), &secondary.uri(), 60);
    let cache = Arc::new(RateCache::with_ttl(config.cache.ttl()));
    let provider = build_provider(&config, Arc::clone(&cache)).unwrap();

    assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.93);
    let entry = cache.entry(&PairKey::new("USD", "EUR")).await.unwrap();
    assert_eq!(entry.rate, 0.93);
}

#[test_log::test(tokio::test)]
async fn test_both_sources_fail() {
    let primary = MockServer::start().await;
    test_utils::mount_primary(
        &primary,
        "USD",
        ResponseTemplate::new(200).set_body_string(r#"{"rates": {}}"#),
    )
    .await;

    // Nothing listens on the secondary, so its request fails at the transport
    let config = test_utils::config(&primary.uri(), "http://127.0.0.1:1", 60);
    let cache = Arc::new(RateCache::with_ttl(config.cache.ttl()));
    let provider = build_provider(&config, Arc::clone(&cache)).unwrap();

    let err = provider.get_rate("USD", "EUR").await.unwrap_err();
    assert_eq!(err, RateUnavailable::new("USD", "EUR"));
    assert!(cache.entry(&PairKey::new("USD", "EUR")).await.is_none());
}

#[test_log::test(tokio::test)]
async fn test_expired_entry_is_refreshed() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.92}}"#))
        .up_to_n_times(1)
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.95}}"#))
        .expect(1)
        .mount(&primary)
        .await;

    let config = test_utils::config(&primary.uri(), &secondary.uri(), 60);
    let cache = Arc::new(RateCache::with_ttl(std::time::Duration::from_millis(50)));
    let provider = build_provider(&config, Arc::clone(&cache)).unwrap();

    assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.92);
    tokio::time::sleep(std::time::Duration::from_millis(80)).await;
    assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 0.95);
    assert_eq!(cache.get(&PairKey::new("USD", "EUR")).await, Some(0.95));
}

#[test_log::test(tokio::test)]
async fn test_concurrent_requests_share_fetch() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"rates": {"EUR": 0.92}}"#)
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&primary)
        .await;

    let config = test_utils::config(&primary.uri(), &secondary.uri(), 60);
    let provider = build_provider(&config, Arc::new(RateCache::new())).unwrap();

    let (a, b) = tokio::join!(
        provider.get_rate("USD", "EUR"),
        provider.get_rate("USD", "EUR")
    );
    assert_eq!(a.unwrap(), 0.92);
    assert_eq!(b.unwrap(), 0.92);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_primary(
        &primary,
        "USD",
        ResponseTemplate::new(200)
            .set_body_string(r#"{"base": "USD", "rates": {"EUR": 0.92, "GBP": 0.79}}"#),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        sources:
          - type: exchangerate_api
            base_url: {}
          - type: fixer
            base_url: {}
        cache:
          ttl_secs: 60
    "#,
        primary.uri(),
        secondary.uri()
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = xconv::run_command(
        xconv::AppCommand::Convert {
            amount: 100.0,
            from: "usd".to_string(),
            to: vec!["EUR".to_string(), "GBP".to_string()],
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let result = xconv::run_command(
        xconv::AppCommand::Rate {
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rate failed with: {:?}", result.err());

    let result = xconv::run_command(
        xconv::AppCommand::Rate {
            from: "USD".to_string(),
            to: "XXX".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live exchange rate service"]
async fn test_real_exchangerate_api() {
    let cache = Arc::new(RateCache::new());
    let provider = build_provider(&AppConfig::default(), cache).unwrap();

    let from_currency = "USD";
    let to_currency = "EUR";
    info!(?from_currency, ?to_currency, "Fetching live currency rate");

    match provider.get_rate(from_currency, to_currency).await {
        Ok(rate) => {
            info!(?rate, "Received successful currency rate response");
            assert!(rate > 0.0, "Currency rate should be positive");
        }
        Err(e) => {
            error!("Currency rate request failed: {e}\n{e:?}");
            panic!("Currency rate request failed: {e}");
        }
    }
}
