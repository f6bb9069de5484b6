//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_API_URL` - Catalog/stock API base URL (default: `http://localhost:3333`)
//! - `CART_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Product cache TTL (default: 300)
//! - `CART_STORAGE_KEY` - Slot key for the cart (default: `@RocketShoes:cart`)
//! - `CART_STORAGE` - Slot backend: `memory`, `file`, or `postgres` (default: `file`)
//! - `CART_STORAGE_PATH` - File slot path (default: `.rocket-shoes-cart.json`)
//!
//! ## Required for `CART_STORAGE=postgres`
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Slot key used when `CART_STORAGE_KEY` is unset.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog and stock API configuration
    pub api: ApiConfig,
    /// Persistence slot backend
    pub storage: StorageConfig,
    /// Fixed key the whole cart is stored under
    pub storage_key: String,
}

/// Catalog and stock API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoints are `products/{id}` and `stock/{id}` under it
    pub base_url: Url,
    /// How long fetched products stay cached
    pub product_cache_ttl: Duration,
    /// Timeout for a single request
    pub request_timeout: Duration,
}

/// Persistence slot backend selection.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub enum StorageConfig {
    /// In-process map; the cart is lost on exit.
    Memory,
    /// JSON file at `path`.
    File { path: PathBuf },
    /// `cart.slot` table in `PostgreSQL`.
    Postgres { database_url: SecretString },
}

impl StorageConfig {
    /// Short backend name for logs.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
            Self::Postgres { .. } => "postgres",
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::File { path } => f.debug_struct("File").field("path", path).finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the Postgres backend
    /// is selected without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    fn from_source(source: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(source);

        let base_url = vars.or_default("CART_API_URL", "http://localhost:3333");
        let api = ApiConfig {
            base_url: Url::parse(&base_url).map_err(|e| {
                ConfigError::InvalidEnvVar("CART_API_URL".to_string(), e.to_string())
            })?,
            product_cache_ttl: Duration::from_secs(
                vars.parsed("CART_PRODUCT_CACHE_TTL_SECS", 300)?,
            ),
            request_timeout: Duration::from_secs(vars.parsed("CART_API_TIMEOUT_SECS", 10)?),
        };

        let backend = vars.or_default("CART_STORAGE", "file").to_lowercase();
        let storage = match backend.as_str() {
            "memory" => StorageConfig::Memory,
            "file" => StorageConfig::File {
                path: PathBuf::from(
                    vars.or_default("CART_STORAGE_PATH", ".rocket-shoes-cart.json"),
                ),
            },
            "postgres" => StorageConfig::Postgres {
                database_url: vars.database_url("CART_DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE".to_string(),
                    format!("unknown backend '{other}' (expected memory, file, or postgres)"),
                ));
            }
        };

        let storage_key = vars.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api,
            storage,
            storage_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookups over a source function.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a numeric variable with a default value.
    fn parsed(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}
