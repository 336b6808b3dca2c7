//! Failure taxonomy for the price feed.
//!
//! Every source in the fallback chain fails with one of these; the chain
//! loop catches them and advances to the next source. `SourcesExhausted`
//! is only produced once the whole chain has been walked.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Request rejected before a usable response arrived.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response arrived with a non-success HTTP status.
    #[error("unexpected HTTP status: {0}")]
    Status(u16),

    /// Response parsed but is missing the fields this source promises.
    #[error("malformed payload: {0}")]
    DataShape(String),

    /// Every source in the fallback chain failed.
    #[error("all spot price sources exhausted")]
    SourcesExhausted,
}
