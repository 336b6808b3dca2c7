//! Primary spot source: keyed metal rates with an in-payload success flag.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::FeedError;
use crate::core::price::{GOLD_CODE, SpotPriceProvider};

pub struct MetalPriceSource {
    base_url: String,
    base_currency: String,
}

impl MetalPriceSource {
    pub fn new(base_url: &str, base_currency: &str) -> Self {
        MetalPriceSource {
            base_url: base_url.to_string(),
            base_currency: base_currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl SpotPriceProvider for MetalPriceSource {
    fn name(&self) -> &'static str {
        "metalprice"
    }

    async fn fetch_spot(&self) -> Result<f64, FeedError> {
        let url = format!(
            "{}/v1/latest?base={}&currencies={}",
            self.base_url, self.base_currency, GOLD_CODE
        );
        debug!("Requesting metal rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("goldfeed/1.0")
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| FeedError::DataShape(format!("rates payload: {e}")))?;

        if !data.success {
            return Err(FeedError::DataShape("success flag not set".to_string()));
        }

        data.rates
            .get(GOLD_CODE)
            .copied()
            .ok_or_else(|| FeedError::DataShape(format!("no {GOLD_CODE} entry in rates")))
    }
}
