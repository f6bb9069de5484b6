//! Outbound ports the cart store depends on.
//!
//! The store never talks to HTTP or a database directly; it only sees these
//! traits. [`crate::api::ApiClient`] implements the two lookups and
//! [`crate::storage`] provides the persistence slots.

use async_trait::async_trait;
use rocket_shoes_core::{Product, ProductId, Stock};

use crate::api::ApiError;
use crate::storage::StorageError;

/// Read-only product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a product by id.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

/// Read-only stock level lookup.
///
/// Implementations must not cache: every call reflects the remote value.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock level for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}

/// String-keyed durable storage holding the serialized cart.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
