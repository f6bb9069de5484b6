//! The cart store.
//!
//! [`CartStore`] owns the shopper's current [`Cart`], validates every
//! mutation against a freshly fetched stock level, and writes the full cart
//! to the persistence slot after each successful change.
//!
//! # Flow
//!
//! Each operation runs in three steps:
//!
//! 1. Remote lookups (product, stock) - the only suspension points
//! 2. Validate and transform the latest cart, then commit it in one step
//! 3. Serialize the committed cart to the slot
//!
//! Stock is checked before the commit, so two overlapping adds of the same
//! product can both pass the check. Commits themselves never lose each
//! other's changes: the transform runs against the cart current at commit
//! time, not the one seen before the lookups.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = Arc::new(ApiClient::new(&config.api)?);
//! let slot = storage::open(&config.storage).await?;
//! let store = CartStore::hydrate(api.clone(), api, slot, &config.storage_key).await?;
//!
//! let mut updates = store.subscribe();
//! if let Err(notice) = store.add_product(ProductId::new(1)).await {
//!     show_toast(notice.message());
//! }
//! ```

use std::sync::Arc;

use rocket_shoes_core::{Cart, ProductId};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, instrument, warn};

use crate::api::ApiClient;
use crate::config::CartConfig;
use crate::error::{CartError, Notice, Operation, SetupError};
use crate::ports::{KeyValueStore, ProductCatalog, StockService};
use crate::storage::{self, StorageError};

/// Request to set the quantity of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
}

/// Shopping cart state shared across the UI.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn ProductCatalog>,
    stock: Arc<dyn StockService>,
    slot: Arc<dyn KeyValueStore>,
    key: String,
    cart: watch::Sender<Arc<Cart>>,
    /// Held while writing to the slot so writes land in commit order.
    persist_lock: Mutex<()>,
}

impl CartStore {
    /// Create a store holding `cart`.
    ///
    /// Nothing is written to the slot until the first successful mutation.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        stock: Arc<dyn StockService>,
        slot: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        cart: Cart,
    ) -> Self {
        let (sender, _) = watch::channel(Arc::new(cart));
        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                stock,
                slot,
                key: key.into(),
                cart: sender,
                persist_lock: Mutex::new(()),
            }),
        }
    }

    /// Create a store holding the cart last persisted under `key`.
    ///
    /// An absent value yields an empty cart. A value that cannot be parsed
    /// as a cart is logged and also yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read.
    #[instrument(skip(catalog, stock, slot, key))]
    pub async fn hydrate(
        catalog: Arc<dyn ProductCatalog>,
        stock: Arc<dyn StockService>,
        slot: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let key = key.into();

        let cart = match slot.get(&key).await? {
            Some(json) => Cart::from_json(&json).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Discarding unreadable persisted cart");
                Cart::new()
            }),
            None => Cart::new(),
        };

        debug!(key = %key, entries = cart.len(), "Hydrated cart");
        Ok(Self::new(catalog, stock, slot, key, cart))
    }

    /// Build the configured API client and slot, then hydrate.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the API client cannot be built or the slot
    /// cannot be opened or read.
    pub async fn from_config(config: &CartConfig) -> Result<Self, SetupError> {
        let api = Arc::new(ApiClient::new(&config.api)?);
        let slot = storage::open(&config.storage).await?;

        tracing::info!(
            api = %config.api.base_url,
            backend = config.storage.backend_name(),
            key = %config.storage_key,
            "Opening cart store"
        );

        Ok(Self::hydrate(api.clone(), api, slot, config.storage_key.clone()).await?)
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.cart.borrow())
    }

    /// Watch for committed carts.
    ///
    /// The receiver is notified once per successful mutation; failed
    /// operations never notify.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.cart.subscribe()
    }

    /// The slot key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is added with amount 1; otherwise its
    /// amount is incremented. The resulting amount must be covered by the
    /// product's current stock.
    ///
    /// # Errors
    ///
    /// - [`Notice::OutOfStock`] if stock does not cover the new amount
    /// - [`Notice::AddFailed`] if the product or stock lookup fails
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Arc<Cart>, Notice> {
        let outcome = self.try_add_product(product_id).await;
        self.finish(Operation::Add, outcome).await
    }

    /// Remove a product's entry.
    ///
    /// # Errors
    ///
    /// - [`Notice::RemoveFailed`] if the product is not in the cart
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Arc<Cart>, Notice> {
        let outcome = self.commit(|cart| {
            cart.without(product_id)
                .ok_or(CartError::NotInCart(product_id))
        });
        self.finish(Operation::Remove, outcome).await
    }

    /// Set the amount of a product already in the cart.
    ///
    /// # Errors
    ///
    /// - [`Notice::OutOfStock`] if `amount` is zero, exceeds stock, stock is
    ///   empty, or the product is not in the cart
    /// - [`Notice::UpdateFailed`] if the stock lookup fails
    #[instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Arc<Cart>, Notice> {
        let outcome = self.try_update_product_amount(request).await;
        self.finish(Operation::UpdateAmount, outcome).await
    }

    async fn try_add_product(&self, id: ProductId) -> Result<Arc<Cart>, CartError> {
        let product = self.inner.catalog.product(id).await?;
        let stock = self.inner.stock.stock(id).await?;

        self.commit(|cart| {
            let requested = cart.amount_after_add(id);
            if !stock.covers(requested) {
                return Err(CartError::OutOfStock {
                    id,
                    requested,
                    available: stock.amount,
                });
            }
            Ok(cart.with_product(product))
        })
    }

    async fn try_update_product_amount(
        &self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<Arc<Cart>, CartError> {
        let stock = self.inner.stock.stock(product_id).await?;

        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                id: product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        self.commit(|cart| {
            cart.with_amount(product_id, amount)
                .ok_or(CartError::NotInCart(product_id))
        })
    }

    /// Validate and replace the current cart in one step.
    ///
    /// Subscribers are notified only when `transform` succeeds.
    fn commit<F>(&self, transform: F) -> Result<Arc<Cart>, CartError>
    where
        F: FnOnce(&Cart) -> Result<Cart, CartError>,
    {
        let mut outcome = Err(CartError::Uncommitted);
        self.inner.cart.send_if_modified(|current| {
            outcome = transform(current.as_ref()).map(Arc::new);
            if let Ok(next) = &outcome {
                *current = Arc::clone(next);
                true
            } else {
                false
            }
        });
        outcome
    }

    /// Persist a committed cart, or turn a failure into a notice.
    async fn finish(
        &self,
        operation: Operation,
        outcome: Result<Arc<Cart>, CartError>,
    ) -> Result<Arc<Cart>, Notice> {
        match outcome {
            Ok(cart) => {
                self.persist().await;
                Ok(cart)
            }
            Err(e) => {
                let notice = Notice::for_failure(operation, &e);
                match e {
                    CartError::Api(_) | CartError::Uncommitted => {
                        error!(?operation, error = %e, notice = %notice, "Cart lookup failed");
                    }
                    CartError::OutOfStock { .. } | CartError::NotInCart(_) => {
                        warn!(?operation, error = %e, notice = %notice, "Cart change rejected");
                    }
                }
                Err(notice)
            }
        }
    }

    /// Write the latest committed cart to the slot.
    ///
    /// Writes are serialized and each one reads the cart current at write
    /// time, so the last write always holds the newest commit. A failed write
    /// is logged and the next successful mutation overwrites the slot again.
    async fn persist(&self) {
        let _guard = self.inner.persist_lock.lock().await;
        let cart = self.cart();
        let json = match cart.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.inner.slot.set(&self.inner.key, &json).await {
            error!(key = %self.inner.key, error = %e, "Failed to persist cart");
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("entries", &self.inner.cart.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rocket_shoes_core::{Product, Stock};

    use super::*;
    use crate::api::ApiError;
    use crate::storage::MemorySlot;

    const KEY: &str = "@RocketShoes:cart";

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: "179.90".parse().unwrap(),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    /// Catalog and stock service backed by maps; unknown ids are not found.
    #[derive(Default)]
    struct FakeApi {
        products: HashMap<ProductId, Product>,
        stock: Mutex<HashMap<ProductId, u32>>,
        stock_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with_stock(levels: &[(i32, u32)]) -> Arc<Self> {
            Arc::new(Self {
                products: levels
                    .iter()
                    .map(|(id, _)| (ProductId::new(*id), product(*id)))
                    .collect(),
                stock: Mutex::new(
                    levels
                        .iter()
                        .map(|(id, amount)| (ProductId::new(*id), *amount))
                        .collect(),
                ),
                stock_calls: AtomicUsize::new(0),
            })
        }

        fn set_stock(&self, id: i32, amount: u32) {
            self.stock
                .lock()
                .unwrap()
                .insert(ProductId::new(id), amount);
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeApi {
        async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
            self.products
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("/products/{id}")))
        }
    }

    #[async_trait]
    impl StockService for FakeApi {
        async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            self.stock
                .lock()
                .unwrap()
                .get(&id)
                .map(|amount| Stock {
                    id,
                    amount: *amount,
                })
                .ok_or_else(|| ApiError::NotFound(format!("/stock/{id}")))
        }
    }

    /// Slot whose writes always fail.
    struct BrokenSlot;

    #[async_trait]
    impl KeyValueStore for BrokenSlot {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    /// Memory slot whose first write stalls before landing.
    #[derive(Default)]
    struct SlowFirstWriteSlot {
        inner: MemorySlot,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for SlowFirstWriteSlot {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.writes.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            self.inner.set(key, value).await
        }
    }

    fn store_with(api: &Arc<FakeApi>, slot: &Arc<MemorySlot>, cart: Cart) -> CartStore {
        CartStore::new(api.clone(), api.clone(), slot.clone(), KEY, cart)
    }

    async fn persisted(slot: &MemorySlot) -> Option<Cart> {
        slot.get(KEY)
            .await
            .unwrap()
            .map(|json| Cart::from_json(&json).unwrap())
    }

    fn cart_of(entries: &[(i32, u32)]) -> Cart {
        entries.iter().fold(Cart::new(), |cart, (id, amount)| {
            cart.with_product(product(*id))
                .with_amount(ProductId::new(*id), *amount)
                .unwrap()
        })
    }

    // =========================================================================
    // add_product
    // =========================================================================

    #[tokio::test]
    async fn test_add_new_product() {
        let api = FakeApi::with_stock(&[(1, 3)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());

        let cart = store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(cart.len(), 1);
        let entry = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(entry.amount, 1);
        assert_eq!(entry.title, "Tênis 1");
        assert_eq!(persisted(&slot).await.as_ref(), Some(&*cart));
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let api = FakeApi::with_stock(&[(1, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        let cart = store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(*cart, cart_of(&[(1, 2)]));
        assert_eq!(persisted(&slot).await, Some(cart_of(&[(1, 2)])));
    }

    #[tokio::test]
    async fn test_add_beyond_stock_leaves_cart_unchanged() {
        let api = FakeApi::with_stock(&[(1, 2)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 2)]));

        let result = store.add_product(ProductId::new(1)).await;

        assert_eq!(result.unwrap_err(), Notice::OutOfStock);
        assert_eq!(*store.cart(), cart_of(&[(1, 2)]));
        assert!(persisted(&slot).await.is_none());
    }

    #[tokio::test]
    async fn test_add_with_empty_stock() {
        let api = FakeApi::with_stock(&[(2, 0)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());

        let result = store.add_product(ProductId::new(2)).await;

        assert_eq!(result.unwrap_err(), Notice::OutOfStock);
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_add_failed() {
        let api = FakeApi::with_stock(&[(1, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        let result = store.add_product(ProductId::new(99)).await;

        assert_eq!(result.unwrap_err(), Notice::AddFailed);
        assert_eq!(*store.cart(), cart_of(&[(1, 1)]));
    }

    #[tokio::test]
    async fn test_add_reads_fresh_stock_every_time() {
        let api = FakeApi::with_stock(&[(1, 1)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());

        store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(
            store.add_product(ProductId::new(1)).await.unwrap_err(),
            Notice::OutOfStock
        );

        api.set_stock(1, 2);
        let cart = store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
        assert_eq!(api.stock_calls.load(Ordering::SeqCst), 3);
    }

    // =========================================================================
    // remove_product
    // =========================================================================

    #[tokio::test]
    async fn test_remove_present_product() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1), (2, 3)]));

        let cart = store.remove_product(ProductId::new(1)).await.unwrap();

        assert_eq!(*cart, cart_of(&[(2, 3)]));
        assert_eq!(persisted(&slot).await, Some(cart_of(&[(2, 3)])));
        assert_eq!(api.stock_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_product() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        let result = store.remove_product(ProductId::new(7)).await;

        assert_eq!(result.unwrap_err(), Notice::RemoveFailed);
        assert_eq!(*store.cart(), cart_of(&[(1, 1)]));
        assert!(persisted(&slot).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_last_product_persists_empty_cart() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        store.remove_product(ProductId::new(1)).await.unwrap();

        assert_eq!(slot.get(KEY).await.unwrap().as_deref(), Some("[]"));
    }

    // =========================================================================
    // update_product_amount
    // =========================================================================

    fn update(id: i32, amount: u32) -> UpdateProductAmount {
        UpdateProductAmount {
            product_id: ProductId::new(id),
            amount,
        }
    }

    #[tokio::test]
    async fn test_update_replaces_only_target_amount() {
        let api = FakeApi::with_stock(&[(1, 5), (2, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1), (2, 2)]));

        let cart = store.update_product_amount(update(2, 5)).await.unwrap();

        assert_eq!(*cart, cart_of(&[(1, 1), (2, 5)]));
        assert_eq!(persisted(&slot).await, Some(cart_of(&[(1, 1), (2, 5)])));
    }

    #[tokio::test]
    async fn test_update_to_zero_or_beyond_stock() {
        let api = FakeApi::with_stock(&[(1, 3)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 2)]));

        for amount in [0, 4] {
            assert_eq!(
                store.update_product_amount(update(1, amount)).await.unwrap_err(),
                Notice::OutOfStock
            );
        }
        assert_eq!(*store.cart(), cart_of(&[(1, 2)]));
        assert!(persisted(&slot).await.is_none());
    }

    #[tokio::test]
    async fn test_update_with_empty_stock() {
        let api = FakeApi::with_stock(&[(1, 0)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        assert_eq!(
            store.update_product_amount(update(1, 1)).await.unwrap_err(),
            Notice::OutOfStock
        );
    }

    #[tokio::test]
    async fn test_update_missing_product_reports_out_of_stock() {
        let api = FakeApi::with_stock(&[(1, 5), (2, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        assert_eq!(
            store.update_product_amount(update(2, 1)).await.unwrap_err(),
            Notice::OutOfStock
        );
        assert_eq!(*store.cart(), cart_of(&[(1, 1)]));
    }

    #[tokio::test]
    async fn test_update_stock_lookup_failure() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, cart_of(&[(1, 1)]));

        assert_eq!(
            store.update_product_amount(update(1, 1)).await.unwrap_err(),
            Notice::UpdateFailed
        );
    }

    // =========================================================================
    // Hydration, subscription, persistence
    // =========================================================================

    #[tokio::test]
    async fn test_hydrate_restores_persisted_cart() {
        let api = FakeApi::with_stock(&[(1, 5), (2, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(2)).await.unwrap();
        store.add_product(ProductId::new(2)).await.unwrap();

        let reloaded = CartStore::hydrate(api.clone(), api.clone(), slot.clone(), KEY)
            .await
            .unwrap();

        assert_eq!(*reloaded.cart(), *store.cart());
        assert_eq!(reloaded.storage_key(), KEY);
    }

    #[tokio::test]
    async fn test_hydrate_empty_slot() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::new());

        let store = CartStore::hydrate(api.clone(), api, slot, KEY).await.unwrap();

        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_discards_corrupt_value() {
        let api = FakeApi::with_stock(&[]);
        let slot = Arc::new(MemorySlot::with_value(KEY, "{not a cart"));

        let store = CartStore::hydrate(api.clone(), api, slot, KEY).await.unwrap();

        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_commits_only() {
        let api = FakeApi::with_stock(&[(1, 1)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());
        let mut updates = store.subscribe();

        store.add_product(ProductId::new(1)).await.unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().len(), 1);

        store.add_product(ProductId::new(1)).await.unwrap_err();
        store.remove_product(ProductId::new(5)).await.unwrap_err();
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_committed_cart() {
        let api = FakeApi::with_stock(&[(1, 5)]);
        let store = CartStore::new(
            api.clone(),
            api.clone(),
            Arc::new(BrokenSlot),
            KEY,
            Cart::new(),
        );

        let cart = store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(*store.cart(), *cart);
    }

    #[tokio::test]
    async fn test_overlapping_writes_persist_latest_cart() {
        let api = FakeApi::with_stock(&[(1, 5), (2, 5)]);
        let slot = Arc::new(SlowFirstWriteSlot::default());
        let store = CartStore::new(api.clone(), api.clone(), slot.clone(), KEY, Cart::new());
        let other = store.clone();

        let (first, second) = tokio::join!(
            store.add_product(ProductId::new(1)),
            other.add_product(ProductId::new(2))
        );
        first.unwrap();
        second.unwrap();

        let stored = slot.get(KEY).await.unwrap().unwrap();
        assert_eq!(store.cart().len(), 2);
        assert_eq!(Cart::from_json(&stored).unwrap(), *store.cart());
        assert_eq!(slot.writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let api = FakeApi::with_stock(&[(1, 5)]);
        let slot = Arc::new(MemorySlot::new());
        let store = store_with(&api, &slot, Cart::new());
        let other = store.clone();

        store.add_product(ProductId::new(1)).await.unwrap();
        other.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(*store.cart(), cart_of(&[(1, 2)]));
    }

    #[test]
    fn test_update_request_json() {
        let request: UpdateProductAmount =
            serde_json::from_str(r#"{"productId": 3, "amount": 2}"#).unwrap();
        assert_eq!(request, update(3, 2));
    }
}
