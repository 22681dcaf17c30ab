//! Characteristic repository trait.

use crate::error::StoreResult;
use crate::models::CharacteristicRow;
use async_trait::async_trait;

/// Repository for characteristic operations.
#[async_trait]
pub trait CharacteristicRepo: Send + Sync {
    /// Create a new characteristic. Duplicate names are allowed.
    async fn create_characteristic(&self, name: &str) -> StoreResult<CharacteristicRow>;

    /// List characteristics, optionally restricted to a name prefix,
    /// in insertion order.
    async fn list_characteristics(
        &self,
        name_prefix: Option<&str>,
    ) -> StoreResult<Vec<CharacteristicRow>>;
}
