pub mod core;
pub mod providers;
pub mod store;
pub mod ui;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::currency::ExchangeRate;
use crate::core::feed::PriceFeed;
use crate::core::price::{SpotPriceProvider, SpotQuote};
use crate::store::{FjallCache, MemoryCache};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Rates,
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Gold feed starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let feed = build_feed(&config);

    match command {
        AppCommand::Rates => {
            let pb = ui::new_spinner("Fetching gold prices...");
            let snapshot = feed.refresh().await;
            pb.finish_and_clear();
            println!(
                "{}",
                ui::render_snapshot(&snapshot, &config.base_currency, &config.local_currency)
            );
            Ok(())
        }
        AppCommand::Watch => {
            let period = Duration::from_secs(config.refresh_minutes.max(1) * 60);
            let mut interval = tokio::time::interval(period);
            // First tick fires immediately, so the initial render is not
            // delayed by a full period.
            loop {
                interval.tick().await;
                let snapshot = feed.refresh().await;
                println!(
                    "{}",
                    ui::render_snapshot(&snapshot, &config.base_currency, &config.local_currency)
                );
                ui::print_separator();
            }
        }
    }
}

/// Wires caches and providers into a feed from the loaded config.
pub fn build_feed(config: &AppConfig) -> PriceFeed {
    let (rate_cache, spot_cache) = open_caches(config);

    let metal_url = config
        .providers
        .metalprice
        .as_ref()
        .map_or("https://api.metalpriceapi.com", |p| &p.base_url);
    let spot_url = config
        .providers
        .spotgold
        .as_ref()
        .map_or("https://api.spotgold.io", |p| &p.base_url);
    let series_url = config
        .providers
        .commodities
        .as_ref()
        .map_or("https://api.commodities.dev", |p| &p.base_url);
    let currency_url = config
        .providers
        .currency
        .as_ref()
        .map_or("https://open.er-api.com", |p| &p.base_url);

    // Chain order is the fallback order
    let sources: Vec<Arc<dyn SpotPriceProvider>> = vec![
        Arc::new(providers::metalprice::MetalPriceSource::new(
            metal_url,
            &config.base_currency,
        )),
        Arc::new(providers::spotgold::SpotGoldSource::new(spot_url)),
        Arc::new(providers::commodities::CommoditySeriesSource::new(
            series_url,
        )),
    ];
    let currency = Arc::new(providers::open_rates::OpenRatesSource::new(currency_url));

    PriceFeed::new(
        currency,
        sources,
        rate_cache,
        spot_cache,
        &config.base_currency,
        &config.local_currency,
    )
}

type RateCache = Arc<dyn Cache<String, ExchangeRate>>;
type SpotCache = Arc<dyn Cache<String, SpotQuote>>;

fn open_caches(config: &AppConfig) -> (RateCache, SpotCache) {
    let opened = config.default_data_path().and_then(|path| {
        let keyspace = store::open_keyspace(&path)?;
        let rates: FjallCache<String, ExchangeRate> = FjallCache::new(&keyspace, "rates")?;
        let spot: FjallCache<String, SpotQuote> = FjallCache::new(&keyspace, "spot")?;
        Ok((rates, spot))
    });

    match opened {
        Ok((rates, spot)) => (Arc::new(rates) as RateCache, Arc::new(spot) as SpotCache),
        Err(err) => {
            warn!(%err, "Durable cache unavailable, falling back to in-memory");
            (
                Arc::new(MemoryCache::<String, ExchangeRate>::new()) as RateCache,
                Arc::new(MemoryCache::<String, SpotQuote>::new()) as SpotCache,
            )
        }
    }
}
