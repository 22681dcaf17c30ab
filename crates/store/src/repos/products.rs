//! Product repository trait.

use crate::error::StoreResult;
use crate::models::{CharacteristicRow, NewProduct, ProductRow, ProductWithCategory};
use async_trait::async_trait;
use stockroom_core::ProductFilter;

/// Repository for product operations.
#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Insert a new product and link its characteristics, atomically.
    async fn create_product(&self, new: &NewProduct) -> StoreResult<ProductRow>;

    /// Get a product by id.
    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductRow>>;

    /// Get a product joined with its category name.
    async fn get_product_with_category(&self, id: i64)
    -> StoreResult<Option<ProductWithCategory>>;

    /// List products matching the filter's predicate conjunction,
    /// ordered by name ascending. One query per call, however many
    /// predicates the filter accumulated.
    async fn list_products(&self, filter: &ProductFilter)
    -> StoreResult<Vec<ProductWithCategory>>;

    /// Apply a signed delta to a product's quantity inside one
    /// transaction. Fails without side effect when the product is
    /// unknown or the resulting quantity would be negative.
    async fn adjust_quantity(&self, id: i64, delta: i64) -> StoreResult<ProductRow>;

    /// Insert a batch of products inside one transaction: any failure
    /// (malformed reference, duplicate name) rolls back the whole
    /// batch. Returns the number of rows inserted.
    async fn import_products(&self, records: &[NewProduct]) -> StoreResult<u64>;

    /// Characteristics linked to a product, in link insertion order.
    async fn product_characteristics(&self, id: i64) -> StoreResult<Vec<CharacteristicRow>>;
}
