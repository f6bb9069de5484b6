//! Rocket Shoes Core - Shared types library.
//!
//! This crate provides the types used across all Rocket Shoes components:
//! - `cart` - Cart store, service ports, and adapters
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure transforms - no I/O, no
//! database access, no HTTP clients. Cart mutations here never touch stock or
//! persistence; those checks live in the `cart` crate.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog products, and the cart value

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
