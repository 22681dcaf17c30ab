//! Category repository trait.

use crate::error::StoreResult;
use crate::models::CategoryRow;
use async_trait::async_trait;

/// Repository for category operations.
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Create a new category. Names are unique.
    async fn create_category(&self, name: &str) -> StoreResult<CategoryRow>;

    /// Get a category by id.
    async fn get_category(&self, id: i64) -> StoreResult<Option<CategoryRow>>;

    /// List categories, optionally restricted to a name prefix, in
    /// insertion order.
    async fn list_categories(&self, name_prefix: Option<&str>) -> StoreResult<Vec<CategoryRow>>;

    /// Delete a category. Blocked (not cascaded) while any product
    /// references it.
    async fn delete_category(&self, id: i64) -> StoreResult<()>;
}
