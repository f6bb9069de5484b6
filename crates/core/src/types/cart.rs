//! The shopper's cart value.
//!
//! [`Cart`] is immutable from the outside: every mutation is a pure transform
//! that returns a new cart and leaves the receiver untouched. Stock checks and
//! persistence are the caller's concern.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};

use super::{Price, Product, ProductId};

/// Errors found when reading a cart from its serialized form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartDataError {
    /// The same product appears in more than one entry.
    #[error("duplicate cart entry for product {0}")]
    DuplicateEntry(ProductId),
    /// An entry holds zero units.
    #[error("cart entry for product {0} has zero amount")]
    ZeroAmount(ProductId),
}

/// A product line in the cart.
///
/// Product fields are copied from the catalog when the product is first added
/// and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub amount: u32,
}

impl CartEntry {
    /// Create an entry holding a single unit of `product`.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Price of this line (`price * amount`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// An ordered collection of cart entries, at most one per product.
///
/// Serializes as a plain JSON array of entries. Insertion order is kept but
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a cart from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or breaks a cart invariant
    /// (duplicate product, zero amount).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the cart to its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Amount the cart would hold after adding one more unit of `id`.
    #[must_use]
    pub fn amount_after_add(&self, id: ProductId) -> u32 {
        self.get(id)
            .map_or(1, |entry| entry.amount.saturating_add(1))
    }

    /// Return a cart with one more unit of `product`.
    ///
    /// An existing entry keeps its stored product fields and position; a new
    /// product is appended with amount 1.
    #[must_use]
    pub fn with_product(&self, product: Product) -> Self {
        if self.contains(product.id) {
            let next = self.amount_after_add(product.id);
            return self.mapped(product.id, next);
        }

        let mut entries = self.entries.clone();
        entries.push(CartEntry::from_product(product));
        Self { entries }
    }

    /// Return a cart with the amount of `id` replaced.
    ///
    /// Returns `None` if the product is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        Some(self.mapped(id, amount))
    }

    /// Return a cart without the entry for `id`.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        Some(Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect(),
        })
    }

    /// Derived totals for display.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let lines: Vec<LineSummary> = self.entries.iter().map(LineSummary::from).collect();
        CartSummary {
            item_count: lines
                .iter()
                .fold(0u32, |acc, line| acc.saturating_add(line.amount)),
            total: lines.iter().map(|line| line.subtotal).sum(),
            lines,
        }
    }

    fn mapped(&self, id: ProductId, amount: u32) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|entry| {
                    if entry.id == id {
                        CartEntry {
                            amount,
                            ..entry.clone()
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = CartDataError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.amount == 0 {
                return Err(CartDataError::ZeroAmount(entry.id));
            }
            if !seen.insert(entry.id) {
                return Err(CartDataError::DuplicateEntry(entry.id));
            }
        }
        Ok(Self { entries })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Display totals for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSummary {
    pub id: ProductId,
    pub title: String,
    pub amount: u32,
    pub unit_price: Price,
    pub subtotal: Price,
}

impl From<&CartEntry> for LineSummary {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            amount: entry.amount,
            unit_price: entry.price,
            subtotal: entry.subtotal(),
        }
    }
}

/// Display totals for the whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<LineSummary>,
    /// Sum of all entry amounts.
    pub item_count: u32,
    pub total: Price,
}
