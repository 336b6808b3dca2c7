//! Currency conversion abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::FeedError;

/// Conversion rate expressed as base-currency units per one unit of the
/// local currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, FeedError>;
}
