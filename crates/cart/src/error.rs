//! Cart error taxonomy and user-facing notices.
//!
//! Store operations classify failures as [`CartError`] internally and hand
//! the caller a [`Notice`], one of four fixed messages meant for a toast or a
//! status line. Callers never see the internal error.

use rocket_shoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors that can occur while building a cart store.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The API client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// The persistence slot could not be opened or read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Why a cart operation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not covered by the fetched stock level.
    #[error("product {id}: requested {requested}, {available} in stock")]
    OutOfStock {
        id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The product has no entry in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// A catalog or stock lookup failed.
    #[error("lookup failed: {0}")]
    Api(#[from] ApiError),

    /// The change was never applied to the cart.
    #[error("cart change was not applied")]
    Uncommitted,
}

/// The cart operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

/// A fixed user-facing message for a failed cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Notice {
    /// The requested quantity is not available.
    #[error("Quantidade solicitada fora de estoque")]
    OutOfStock,
    /// Adding a product failed for a reason other than stock.
    #[error("Erro na adição do produto")]
    AddFailed,
    /// The product to remove is not in the cart.
    #[error("Erro na remoção do produto")]
    RemoveFailed,
    /// Changing a quantity failed for a reason other than stock.
    #[error("Erro na alteração de quantidade do produto")]
    UpdateFailed,
}

impl Notice {
    /// The message text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfStock => "Quantidade solicitada fora de estoque",
            Self::AddFailed => "Erro na adição do produto",
            Self::RemoveFailed => "Erro na remoção do produto",
            Self::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }

    /// Map an operation failure to the notice shown to the shopper.
    ///
    /// Updating the amount of a product that is not in the cart reports
    /// [`Notice::OutOfStock`], matching the storefront's existing behavior.
    #[must_use]
    pub const fn for_failure(operation: Operation, error: &CartError) -> Self {
        match (operation, error) {
            (_, CartError::OutOfStock { .. })
            | (Operation::UpdateAmount, CartError::NotInCart(_)) => Self::OutOfStock,
            (Operation::Add, _) => Self::AddFailed,
            (Operation::Remove, _) => Self::RemoveFailed,
            (Operation::UpdateAmount, CartError::Api(_) | CartError::Uncommitted) => {
                Self::UpdateFailed
            }
        }
    }
}
