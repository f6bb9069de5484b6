//! REST client for the catalog and stock endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use rocket_shoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::config::ApiConfig;
use crate::ports::{ProductCatalog, StockService};

/// How much of an unexpected response body to keep in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the catalog and stock API.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: directory_url(&config.base_url),
                products,
            }),
        })
    }

    /// Build the URL for `{resource}/{id}` under the base URL.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        decode_response(&url, status, retry_after.as_deref(), &body)
    }
}

/// Classify a response by status, then parse its body as `T`.
fn decode_response<T: DeserializeOwned>(
    url: &Url,
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
) -> Result<T, ApiError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = retry_after
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.path().to_string()));
    }

    if !status.is_success() {
        tracing::error!(
            status = %status,
            url = %url,
            body = %truncated(body, LOG_BODY_LIMIT),
            "API returned non-success status"
        );
        return Err(ApiError::Status(status.as_u16(), truncated(body, 200)));
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            url = %url,
            body = %truncated(body, LOG_BODY_LIMIT),
            "Failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(self.endpoint("products", id)?).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }
}

#[async_trait]
impl StockService for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        self.get_json(self.endpoint("stock", id)?).await
    }
}

/// Ensure the base URL path ends in `/` so relative joins append to it.
fn directory_url(base: &Url) -> Url {
    let mut url = base.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn truncated(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}
