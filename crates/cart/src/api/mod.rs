//! Catalog and stock REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - The API is the source of truth for products and stock - NO local sync
//! - Products are cached in memory via `moka` (5 minute TTL by default)
//! - Stock levels are never cached; every cart mutation sees a fresh value
//!
//! # Endpoints
//!
//! - `GET {base}/products/{id}` - product title, price, image
//! - `GET {base}/stock/{id}` - available units
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_shoes_cart::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let product = client.product(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::ApiClient;

use thiserror::Error;

/// Errors that can occur when calling the catalog or stock API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success status other than 404/429.
    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
