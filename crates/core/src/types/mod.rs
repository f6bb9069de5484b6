//! Core types for Rocket Shoes.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartDataError, CartEntry, CartSummary, LineSummary};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, Stock};
