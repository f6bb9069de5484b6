//! Integration tests for Rocket Shoes.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (file slot, in-process catalog)
//! cargo test -p rocket-shoes-integration-tests
//!
//! # Tests against a running catalog API and database
//! CART_API_URL=http://localhost:3333 \
//! CART_DATABASE_URL=postgres://localhost/rocket_shoes \
//!     cargo test -p rocket-shoes-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - store reloads through a file slot
//! - `cart_api` - catalog and stock API client (ignored by default)
//! - `postgres_slot` - `PostgreSQL` slot (ignored by default)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rocket_shoes_cart::api::ApiError;
use rocket_shoes_cart::ports::{ProductCatalog, StockService};
use rocket_shoes_core::{Product, ProductId, Stock};

/// Base URL for the catalog API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("CART_API_URL").unwrap_or_else(|_| "http://localhost:3333".to_string())
}

/// Database URL for the Postgres slot tests (configurable via environment).
#[must_use]
pub fn database_url() -> String {
    std::env::var("CART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "postgres://localhost/rocket_shoes_test".to_string())
}

/// In-process catalog and stock service.
#[derive(Default)]
pub struct StaticShop {
    products: HashMap<ProductId, Product>,
    stock: Mutex<HashMap<ProductId, u32>>,
}

impl StaticShop {
    /// Build a shop from `(id, price, stock)` rows.
    ///
    /// # Panics
    ///
    /// Panics if a price is not a valid decimal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(rows: &[(i32, &str, u32)]) -> Arc<Self> {
        let products = rows
            .iter()
            .map(|(id, price, _)| {
                let id = ProductId::new(*id);
                let product = Product {
                    id,
                    title: format!("Tênis {id}"),
                    price: price.parse().expect("valid price"),
                    image: format!("https://rocketseat-cdn.example.com/{id}.jpg"),
                };
                (id, product)
            })
            .collect();
        let stock = rows
            .iter()
            .map(|(id, _, amount)| (ProductId::new(*id), *amount))
            .collect();

        Arc::new(Self {
            products,
            stock: Mutex::new(stock),
        })
    }

    /// Change the stock level reported for a product.
    ///
    /// # Panics
    ///
    /// Panics if the stock lock is poisoned.
    #[allow(clippy::expect_used)]
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.stock
            .lock()
            .expect("stock lock")
            .insert(ProductId::new(id), amount);
    }
}

#[async_trait]
impl ProductCatalog for StaticShop {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/products/{id}")))
    }
}

#[async_trait]
impl StockService for StaticShop {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let levels = self
            .stock
            .lock()
            .map_err(|_| ApiError::Status(500, "stock lock poisoned".to_string()))?;
        levels
            .get(&id)
            .map(|amount| Stock {
                id,
                amount: *amount,
            })
            .ok_or_else(|| ApiError::NotFound(format!("/stock/{id}")))
    }
}
