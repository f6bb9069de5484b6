//! Rocket Shoes Cart - stock-checked shopping cart with durable persistence.
//!
//! # Architecture
//!
//! - [`CartStore`] holds the cart and runs add/remove/update operations
//! - [`ports`] defines what the store needs from the outside world
//! - [`api`] implements the product and stock lookups over HTTP
//! - [`storage`] implements the persistence slot (memory, file, `PostgreSQL`)
//!
//! Failures never escape as errors: each operation returns a fixed
//! [`Notice`] for the shopper and leaves the cart unchanged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod ports;
pub mod storage;
pub mod store;

pub use config::CartConfig;
pub use error::{CartError, Notice, SetupError};
pub use store::{CartStore, UpdateProductAmount};
