use std::fs;
use tracing::info;

use goldfeed::core::config::{AppConfig, ProvidersConfig, SourceConfig};
use goldfeed::core::feed::FALLBACK_EXCHANGE_RATE;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mock_metal_server(body: &str, status: u16, expected_calls: Option<u64>) -> MockServer {
        let mock_server = MockServer::start().await;
        let mut mock = Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .and(query_param("base", "USD"))
            .and(query_param("currencies", "XAU"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body));
        if let Some(expected) = expected_calls {
            mock = mock.expect(expected);
        }
        mock.mount(&mock_server).await;
        mock_server
    }

    pub async fn mock_spot_server(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/spot/XAU"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn mock_series_server(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/gold/daily"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn mock_currency_server(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/EGP"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

fn test_config(
    metal_uri: &str,
    spot_uri: &str,
    series_uri: &str,
    currency_uri: &str,
    data_path: &std::path::Path,
) -> AppConfig {
    AppConfig {
        providers: ProvidersConfig {
            metalprice: Some(SourceConfig {
                base_url: metal_uri.to_string(),
            }),
            spotgold: Some(SourceConfig {
                base_url: spot_uri.to_string(),
            }),
            commodities: Some(SourceConfig {
                base_url: series_uri.to_string(),
            }),
            currency: Some(SourceConfig {
                base_url: currency_uri.to_string(),
            }),
        },
        data_path: Some(data_path.to_string_lossy().into_owned()),
        ..AppConfig::default()
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mocks() {
    let metal =
        test_utils::mock_metal_server(r#"{"success": true, "rates": {"XAU": 2032.0}}"#, 200, None)
            .await;
    let spot = test_utils::mock_spot_server(r#"[{"price": 2031.0}]"#, 200).await;
    let series =
        test_utils::mock_series_server(r#"{"data": [{"date": "2026-08-04", "price": 2030.0}]}"#, 200)
            .await;
    let currency =
        test_utils::mock_currency_server(r#"{"rates": {"USD": 0.0206}}"#, 200).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
base_currency: "USD"
local_currency: "EGP"
providers:
  metalprice:
    base_url: {}
  spotgold:
    base_url: {}
  commodities:
    base_url: {}
  currency:
    base_url: {}
data_path: {}
"#,
        metal.uri(),
        spot.uri(),
        series.uri(),
        currency.uri(),
        data_dir.path().display(),
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = goldfeed::run_command(
        goldfeed::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_primary_outage_falls_back_to_secondary() {
    let metal = test_utils::mock_metal_server("Server Error", 500, None).await;
    let spot = test_utils::mock_spot_server(r#"[{"price": 1950.5}]"#, 200).await;
    let series =
        test_utils::mock_series_server(r#"{"data": [{"date": "2026-08-04", "price": 2030.0}]}"#, 200)
            .await;
    let currency =
        test_utils::mock_currency_server(r#"{"rates": {"USD": 0.02}}"#, 200).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(
        &metal.uri(),
        &spot.uri(),
        &series.uri(),
        &currency.uri(),
        data_dir.path(),
    );

    let feed = goldfeed::build_feed(&config);
    let snapshot = feed.refresh().await;
    info!(?snapshot, "Snapshot after primary outage");

    assert_eq!(snapshot.spot.price_base, 1950.5);
    assert!(!snapshot.spot.synthetic);
    assert_eq!(snapshot.rate.rate, 0.02);
}

#[test_log::test(tokio::test)]
async fn test_total_outage_degrades_to_fallbacks() {
    let metal = test_utils::mock_metal_server("down", 500, None).await;
    let spot = test_utils::mock_spot_server("down", 500).await;
    let series = test_utils::mock_series_server("down", 500).await;
    let currency = test_utils::mock_currency_server("down", 500).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(
        &metal.uri(),
        &spot.uri(),
        &series.uri(),
        &currency.uri(),
        data_dir.path(),
    );

    let feed = goldfeed::build_feed(&config);
    let snapshot = feed.refresh().await;

    assert_eq!(snapshot.rate.rate, FALLBACK_EXCHANGE_RATE);
    assert!(snapshot.spot.synthetic);
    assert!(snapshot.spot.price_base > 0.0);
}

#[test_log::test(tokio::test)]
async fn test_repeated_refreshes_hit_durable_cache() {
    // Each upstream must be called exactly once across two refreshes.
    let metal =
        test_utils::mock_metal_server(r#"{"success": true, "rates": {"XAU": 2032.0}}"#, 200, Some(1))
            .await;
    let spot = test_utils::mock_spot_server(r#"[{"price": 2031.0}]"#, 200).await;
    let series =
        test_utils::mock_series_server(r#"{"data": [{"date": "2026-08-04", "price": 2030.0}]}"#, 200)
            .await;
    let currency =
        test_utils::mock_currency_server(r#"{"rates": {"USD": 0.0206}}"#, 200).await;

    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(
        &metal.uri(),
        &spot.uri(),
        &series.uri(),
        &currency.uri(),
        data_dir.path(),
    );

    let feed = goldfeed::build_feed(&config);
    let first = feed.refresh().await;
    let second = feed.refresh().await;

    assert_eq!(first.spot.price_base, second.spot.price_base);
    assert_eq!(first.rate.rate, second.rate.rate);
    // Mock expectation (exactly one metal call) is verified on drop
}
