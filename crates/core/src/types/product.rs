//! Catalog product and stock level types.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as published by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identity.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// Remote-reported available quantity for a product.
///
/// This is a per-request snapshot; it is never cached or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Product identity.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl Stock {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.amount >= 1
    }

    /// Whether `quantity` units can be held in a cart.
    #[must_use]
    pub const fn covers(&self, quantity: u32) -> bool {
        self.is_available() && quantity >= 1 && quantity <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.display(), "$179.90");
    }

    #[test]
    fn test_product_rejects_negative_price() {
        let json = r#"{"id": 2, "title": "Tênis", "price": -5, "image": ""}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        assert!(serde_json::from_str::<Stock>(r#"{"id": 1, "amount": -1}"#).is_err());
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.covers(1));
        assert!(stock.covers(3));
        assert!(!stock.covers(0));
        assert!(!stock.covers(4));

        let empty = Stock {
            id: ProductId::new(2),
            amount: 0,
        };
        assert!(!empty.is_available());
        assert!(!empty.covers(0));
    }
}
