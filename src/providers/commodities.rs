//! Tertiary spot source: daily time series, most recent entry wins.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::FeedError;
use crate::core::price::SpotPriceProvider;

pub struct CommoditySeriesSource {
    base_url: String,
}

impl CommoditySeriesSource {
    pub fn new(base_url: &str) -> Self {
        CommoditySeriesSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    data: Vec<SeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct SeriesEntry {
    date: String,
    price: f64,
}

#[async_trait]
impl SpotPriceProvider for CommoditySeriesSource {
    fn name(&self) -> &'static str {
        "commodities"
    }

    async fn fetch_spot(&self) -> Result<f64, FeedError> {
        let url = format!("{}/v1/gold/daily", self.base_url);
        debug!("Requesting gold series from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("goldfeed/1.0")
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let series: SeriesResponse = serde_json::from_str(&text)
            .map_err(|e| FeedError::DataShape(format!("series payload: {e}")))?;

        // Entries are not guaranteed to arrive sorted
        series
            .data
            .iter()
            .filter_map(|entry| {
                NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
                    .ok()
                    .map(|date| (date, entry.price))
            })
            .max_by_key(|(date, _)| *date)
            .map(|(_, price)| price)
            .ok_or_else(|| FeedError::DataShape("no dated entries in series".to_string()))
    }
}
