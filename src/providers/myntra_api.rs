use super::util::{get_text, http_client, product_id_from_url};
use crate::core::{FetchError, ProductFetcher, ProductSnapshot};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

/// Reads product details from the Myntra product page JSON API.
pub struct MyntraApiFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl MyntraApiFetcher {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }

    pub fn api_url(&self, product_id: &str) -> String {
        format!(
            "{}/productpage/v3/{}?appVersion=1.0.0&analytics=true",
            self.base_url, product_id
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProductPageResponse {
    product: Option<ProductBody>,
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    name: Option<String>,
    price: Option<PriceBody>,
    media: Option<MediaBody>,
}

#[derive(Debug, Deserialize)]
struct PriceBody {
    #[serde(rename = "finalPrice")]
    final_price: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MediaBody {
    #[serde(rename = "imageUrls", default)]
    image_urls: Vec<String>,
}

fn snapshot_from_response(url: &str, body: &str) -> Result<ProductSnapshot, FetchError> {
    let malformed = |reason: &str| FetchError::Malformed {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let response: ProductPageResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, response = %body, "Failed to parse product response");
        malformed(&e.to_string())
    })?;

    let product = response.product.ok_or_else(|| malformed("missing product"))?;
    let title = product
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| malformed("missing product name"))?;
    let price = product
        .price
        .and_then(|p| p.final_price)
        .ok_or_else(|| malformed("missing finalPrice"))?;
    if price == 0 {
        return Err(FetchError::PriceNotFound(url.to_string()));
    }
    let image_url = product
        .media
        .and_then(|m| m.image_urls.into_iter().next())
        .filter(|u| u.starts_with("http"));

    Ok(ProductSnapshot {
        title,
        price,
        image_url,
    })
}

#[async_trait]
impl ProductFetcher for MyntraApiFetcher {
    async fn fetch_product(&self, url: &str) -> Result<ProductSnapshot, FetchError> {
        let product_id =
            product_id_from_url(url).ok_or_else(|| FetchError::InvalidProductUrl(url.to_string()))?;
        let api_url = self.api_url(product_id);
        debug!("Requesting product data from {}", api_url);

        let body = get_text(&self.client, &api_url).await?;
        if body.trim().is_empty() {
            return Err(FetchError::Malformed {
                url: api_url,
                reason: "empty response".to_string(),
            });
        }

        let snapshot = snapshot_from_response(&api_url, &body)?;
        debug!(
            "Fetched {} for product {}: {}",
            snapshot.price, product_id, snapshot.title
        );
        Ok(snapshot)
    }
}
