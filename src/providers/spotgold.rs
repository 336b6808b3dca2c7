//! Secondary spot source: flat array of quotes, first element wins.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::FeedError;
use crate::core::price::{GOLD_CODE, SpotPriceProvider};

pub struct SpotGoldSource {
    base_url: String,
}

impl SpotGoldSource {
    pub fn new(base_url: &str) -> Self {
        SpotGoldSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotEntry {
    price: f64,
}

#[async_trait]
impl SpotPriceProvider for SpotGoldSource {
    fn name(&self) -> &'static str {
        "spotgold"
    }

    async fn fetch_spot(&self) -> Result<f64, FeedError> {
        let url = format!("{}/v1/spot/{}", self.base_url, GOLD_CODE);
        debug!("Requesting spot quotes from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("goldfeed/1.0")
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let entries: Vec<SpotEntry> = serde_json::from_str(&text)
            .map_err(|e| FeedError::DataShape(format!("spot payload: {e}")))?;

        entries
            .first()
            .map(|entry| entry.price)
            .ok_or_else(|| FeedError::DataShape("empty spot array".to_string()))
    }
}
