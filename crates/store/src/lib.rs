//! Entity store abstraction and implementations for stockroom.
//!
//! This crate provides the durable relational data model:
//! - Categories (unique, indexed names; deletion blocked while referenced)
//! - Characteristics (many-to-many with products)
//! - Products (unique names, non-negative cost/quantity, status text)
//!
//! All mutations run inside single all-or-nothing transactions.

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use postgres::PostgresStore;
pub use store::{InventoryStore, SqliteStore};

use std::sync::Arc;
use stockroom_core::config::StoreConfig;

/// Create an inventory store from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn InventoryStore>> {
    match config {
        StoreConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn InventoryStore>)
        }
        StoreConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                // URL takes precedence when both are provided
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(StoreError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn InventoryStore>)
        }
    }
}
