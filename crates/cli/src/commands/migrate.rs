//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! CART_STORAGE=postgres CART_DATABASE_URL=postgres://... rs-cart migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/cart/migrations/` and are embedded at build time.

use rocket_shoes_cart::CartConfig;
use rocket_shoes_cart::config::StorageConfig;
use rocket_shoes_cart::storage::{create_pool, run_migrations};
use tracing::info;

/// Run the cart slot migrations.
///
/// # Errors
///
/// Returns an error if the configuration does not select the Postgres
/// backend, or if connecting or migrating fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;

    let StorageConfig::Postgres { database_url } = &config.storage else {
        return Err(format!(
            "migrations need CART_STORAGE=postgres (current backend: {})",
            config.storage.backend_name()
        )
        .into());
    };

    info!("Connecting to cart database...");
    let pool = create_pool(database_url).await?;

    info!("Running cart migrations...");
    run_migrations(&pool).await?;

    info!("Cart migrations complete!");
    Ok(())
}
