//! Server test utilities.

use std::sync::Arc;
use stockroom_core::AppConfig;
use stockroom_core::config::StoreConfig;
use stockroom_server::{AppState, create_router};
use stockroom_store::models::{CategoryRow, ProductRow};
use stockroom_store::{InventoryStore, SqliteStore};
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server over a temporary SQLite store.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("stockroom.db");

        let store: Arc<dyn InventoryStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create sqlite store"),
        );

        let config = AppConfig {
            store: StoreConfig::Sqlite { path: db_path },
            ..AppConfig::for_testing()
        };

        let state = AppState::new(config, store);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying store.
    pub fn store(&self) -> Arc<dyn InventoryStore> {
        self.state.store.clone()
    }

    /// Seed a category directly through the store.
    pub async fn seed_category(&self, name: &str) -> CategoryRow {
        self.state
            .store
            .create_category(name)
            .await
            .expect("Failed to seed category")
    }

    /// Seed a product directly through the store.
    pub async fn seed_product(
        &self,
        name: &str,
        cost: i64,
        quantity: i64,
        status: &str,
        category_id: i64,
    ) -> ProductRow {
        let new = stockroom_store::models::NewProduct {
            name: name.to_string(),
            cost,
            quantity,
            status: status.to_string(),
            category_id,
            characteristic_ids: Vec::new(),
        };
        self.state
            .store
            .create_product(&new)
            .await
            .expect("Failed to seed product")
    }
}
