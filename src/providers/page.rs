use super::util::{get_text, http_client, meta_property, parse_price_text, text_by_class, title_text};
use crate::core::{FetchError, ProductFetcher, ProductSnapshot};
use async_trait::async_trait;
use tracing::{debug, warn};

pub const PRICE_CLASS: &str = "pdp-price";

/// Reads the price straight from a rendered product page.
///
/// Only works when the price is present in the served HTML; pages that render
/// the price client-side report `FetchError::PriceNotFound`.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

pub fn snapshot_from_page(url: &str, html: &str) -> Result<ProductSnapshot, FetchError> {
    let price_text =
        text_by_class(html, PRICE_CLASS).ok_or_else(|| FetchError::PriceNotFound(url.to_string()))?;
    let price = parse_price_text(&price_text).ok_or_else(|| {
        warn!("Unparseable price text at {}: {:?}", url, price_text);
        FetchError::PriceNotFound(url.to_string())
    })?;

    let title = text_by_class(html, "pdp-name")
        .or_else(|| text_by_class(html, "pdp-title"))
        .or_else(|| title_text(html))
        .ok_or_else(|| FetchError::Malformed {
            url: url.to_string(),
            reason: "no product title".to_string(),
        })?;

    Ok(ProductSnapshot {
        title,
        price,
        image_url: meta_property(html, "og:image"),
    })
}

#[async_trait]
impl ProductFetcher for PageFetcher {
    async fn fetch_product(&self, url: &str) -> Result<ProductSnapshot, FetchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FetchError::InvalidProductUrl(url.to_string()));
        }
        debug!("Requesting product page {}", url);
        let html = get_text(&self.client, url).await?;
        snapshot_from_page(url, &html)
    }
}
