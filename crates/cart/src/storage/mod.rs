//! Persistence slots for the serialized cart.
//!
//! A slot is an opaque string-keyed get/set store. The cart is written as one
//! JSON array under a single fixed key; there are no partial updates and no
//! versioning of the stored format.
//!
//! # Backends
//!
//! - [`MemorySlot`] - in-process map (tests, throwaway sessions)
//! - [`FileSlot`] - JSON file on disk, survives process restarts
//! - [`PostgresSlot`] - `cart.slot` table, shared by several front ends
//!
//! Select one with [`open`] from a [`StorageConfig`].

mod file;
mod memory;
mod postgres;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileSlot;
pub use memory::MemorySlot;
pub use postgres::{PostgresSlot, create_pool, run_migrations};

use crate::config::StorageConfig;
use crate::ports::KeyValueStore;

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Running migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored data could not be read back.
    #[error("Corrupt slot data: {0}")]
    Corrupt(String),

    /// A lock guarding in-memory slot data was poisoned.
    #[error("Slot lock poisoned")]
    Poisoned,
}

/// Open the slot backend selected by `config`.
///
/// # Errors
///
/// Returns `StorageError::Database` if the Postgres pool cannot connect.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    let slot: Arc<dyn KeyValueStore> = match config {
        StorageConfig::Memory => Arc::new(MemorySlot::new()),
        StorageConfig::File { path } => Arc::new(FileSlot::new(path.clone())),
        StorageConfig::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            Arc::new(PostgresSlot::new(pool))
        }
    };
    tracing::debug!(backend = config.backend_name(), "Opened cart slot");
    Ok(slot)
}
