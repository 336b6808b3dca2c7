//! Spot price abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

use crate::core::error::FeedError;

/// Grams in a troy ounce, the conventional unit for metal pricing.
pub const TROY_OUNCE_GRAMS: f64 = 31.1;

/// Local-market premium applied when converting the spot price to the
/// display currency.
pub const MARKET_ADJUSTMENT: f64 = 1.015;

/// ISO 4217 commodity code for gold.
pub const GOLD_CODE: &str = "XAU";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Karat {
    TwentyFour,
    TwentyOne,
    Eighteen,
}

impl Karat {
    pub const ALL: [Karat; 3] = [Karat::TwentyFour, Karat::TwentyOne, Karat::Eighteen];

    /// Maps a nominal karat label to its tier. Unknown labels are a caller
    /// error and yield `None`.
    pub fn from_label(label: u32) -> Option<Karat> {
        match label {
            24 => Some(Karat::TwentyFour),
            21 => Some(Karat::TwentyOne),
            18 => Some(Karat::Eighteen),
            _ => None,
        }
    }

    pub fn label(&self) -> u32 {
        match self {
            Karat::TwentyFour => 24,
            Karat::TwentyOne => 21,
            Karat::Eighteen => 18,
        }
    }

    /// Fractional gold content of the alloy tier.
    pub fn purity(&self) -> f64 {
        match self {
            Karat::TwentyFour => 0.999,
            Karat::TwentyOne => 0.875,
            Karat::Eighteen => 0.75,
        }
    }
}

impl Display for Karat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}K", self.label())
    }
}

/// A resolved spot price pair. `synthetic` marks quotes fabricated after the
/// whole source chain failed; the flag defaults off so entries cached before
/// it existed still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub price_base: f64,
    pub price_local: f64,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub synthetic: bool,
}

/// Display-ready prices derived from a quote. Always recomputed, never
/// cached.
#[derive(Debug, Clone)]
pub struct DerivedPrice {
    pub per_ounce: f64,
    pub per_gram: f64,
    pub per_karat: HashMap<Karat, f64>,
}

pub fn per_gram(per_ounce: f64) -> f64 {
    per_ounce / TROY_OUNCE_GRAMS
}

pub fn derive_prices(per_ounce: f64) -> DerivedPrice {
    let gram = per_gram(per_ounce);
    let per_karat = Karat::ALL
        .iter()
        .map(|karat| (*karat, gram * karat.purity()))
        .collect();
    DerivedPrice {
        per_ounce,
        per_gram: gram,
        per_karat,
    }
}

#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    /// Source label used in logs when the chain advances past a failure.
    fn name(&self) -> &'static str;

    /// Fetches the current price per troy ounce in the base currency.
    async fn fetch_spot(&self) -> Result<f64, FeedError>;
}
