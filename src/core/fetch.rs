//! Product fetching abstractions and core types

use async_trait::async_trait;
use thiserror::Error;

/// What a fetcher reports for a single product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub title: String,
    pub price: u64,
    pub image_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid product URL: {0}")]
    InvalidProductUrl(String),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("No price found at {0}")]
    PriceNotFound(String),
}

#[async_trait]
pub trait ProductFetcher: Send + Sync {
    async fn fetch_product(&self, url: &str) -> Result<ProductSnapshot, FetchError>;
}
