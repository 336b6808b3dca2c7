//! Currency conversion source: code-keyed rates for one base currency.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::currency::CurrencyRateProvider;
use crate::core::error::FeedError;

pub struct OpenRatesSource {
    base_url: String,
}

impl OpenRatesSource {
    pub fn new(base_url: &str) -> Self {
        OpenRatesSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyRateProvider for OpenRatesSource {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, FeedError> {
        let url = format!("{}/v6/latest/{}", self.base_url, from);
        debug!("Requesting currency rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("goldfeed/1.0")
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let data: RatesResponse = serde_json::from_str(&text)
            .map_err(|e| FeedError::DataShape(format!("rates payload: {e}")))?;

        data.rates
            .get(to)
            .copied()
            .ok_or_else(|| FeedError::DataShape(format!("no {to} entry in rates")))
    }
}
