//! Resolves the current exchange rate and spot price through the source
//! chain, with both results cached under fixed keys.
//!
//! The two resolutions are an explicit two-step pipeline: the exchange
//! rate is resolved first and the spot resolution takes it as input.
//! Overlapping refreshes are not suppressed; both run to completion and
//! the later cache write wins.

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::cache::Cache;
use crate::core::currency::{CurrencyRateProvider, ExchangeRate};
use crate::core::error::FeedError;
use crate::core::price::{MARKET_ADJUSTMENT, SpotPriceProvider, SpotQuote};

pub const RATE_CACHE_KEY: &str = "exchange_rate";
pub const SPOT_CACHE_KEY: &str = "spot_price";

pub const RATE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const SPOT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Returned instead of a live rate when the currency source fails. Never
/// cached, so the next resolution retries the live source.
pub const FALLBACK_EXCHANGE_RATE: f64 = 0.0172;

/// Baseline and jitter bound for the synthetic quote produced when the
/// whole source chain is down.
const SYNTHETIC_BASE_PRICE: f64 = 2400.0;
const SYNTHETIC_JITTER: f64 = 25.0;

#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub rate: ExchangeRate,
    pub spot: SpotQuote,
}

pub struct PriceFeed {
    currency: Arc<dyn CurrencyRateProvider>,
    sources: Vec<Arc<dyn SpotPriceProvider>>,
    rate_cache: Arc<dyn Cache<String, ExchangeRate>>,
    spot_cache: Arc<dyn Cache<String, SpotQuote>>,
    base_currency: String,
    local_currency: String,
}

impl PriceFeed {
    pub fn new(
        currency: Arc<dyn CurrencyRateProvider>,
        sources: Vec<Arc<dyn SpotPriceProvider>>,
        rate_cache: Arc<dyn Cache<String, ExchangeRate>>,
        spot_cache: Arc<dyn Cache<String, SpotQuote>>,
        base_currency: &str,
        local_currency: &str,
    ) -> Self {
        PriceFeed {
            currency,
            sources,
            rate_cache,
            spot_cache,
            base_currency: base_currency.to_string(),
            local_currency: local_currency.to_string(),
        }
    }

    /// Returns the cached rate while it is fresh, otherwise asks the live
    /// source once. A failed live fetch yields the fallback constant,
    /// uncached.
    pub async fn resolve_exchange_rate(&self) -> ExchangeRate {
        if let Some(cached) = self.rate_cache.get(&RATE_CACHE_KEY.to_string()).await {
            return cached;
        }

        match self
            .currency
            .fetch_rate(&self.local_currency, &self.base_currency)
            .await
        {
            Ok(rate) => {
                debug!(rate, "Fetched live exchange rate");
                let entry = ExchangeRate {
                    rate,
                    fetched_at: Utc::now(),
                };
                self.rate_cache
                    .put(RATE_CACHE_KEY.to_string(), entry.clone(), Some(RATE_TTL))
                    .await;
                entry
            }
            Err(err) => {
                warn!(%err, "Currency source failed, using fallback rate");
                ExchangeRate {
                    rate: FALLBACK_EXCHANGE_RATE,
                    fetched_at: Utc::now(),
                }
            }
        }
    }

    /// Returns the cached quote while it is fresh, otherwise walks the
    /// source chain. The resulting quote, synthetic or not, is always
    /// cached.
    pub async fn resolve_spot_price(&self, rate: &ExchangeRate) -> SpotQuote {
        if let Some(cached) = self.spot_cache.get(&SPOT_CACHE_KEY.to_string()).await {
            return cached;
        }

        let (price_base, synthetic) = match self.fetch_from_chain().await {
            Ok(price) => (price, false),
            Err(err) => {
                warn!(%err, "Synthesizing spot price");
                (synthesize_price(), true)
            }
        };

        let quote = SpotQuote {
            price_base,
            price_local: price_base / rate.rate * MARKET_ADJUSTMENT,
            fetched_at: Utc::now(),
            synthetic,
        };
        self.spot_cache
            .put(SPOT_CACHE_KEY.to_string(), quote.clone(), Some(SPOT_TTL))
            .await;
        quote
    }

    /// Resolves rate then spot, in that order.
    pub async fn refresh(&self) -> FeedSnapshot {
        let rate = self.resolve_exchange_rate().await;
        let spot = self.resolve_spot_price(&rate).await;
        FeedSnapshot { rate, spot }
    }

    async fn fetch_from_chain(&self) -> Result<f64, FeedError> {
        for source in &self.sources {
            match source.fetch_spot().await {
                Ok(price) => {
                    debug!(source = source.name(), price, "Spot source succeeded");
                    return Ok(price);
                }
                Err(err) => {
                    warn!(source = source.name(), %err, "Spot source failed, trying next");
                }
            }
        }
        Err(FeedError::SourcesExhausted)
    }
}

fn synthesize_price() -> f64 {
    SYNTHETIC_BASE_PRICE + rand::rng().random_range(0.0..SYNTHETIC_JITTER)
}
