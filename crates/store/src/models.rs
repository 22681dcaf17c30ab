//! Database models mapping to the inventory schema.

use serde::Serialize;
use sqlx::FromRow;
use stockroom_core::import::ImportRecord;
use time::OffsetDateTime;

/// Category record. Category names are unique and indexed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub updated_at: OffsetDateTime,
}

/// Characteristic record. No uniqueness constraint on the name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacteristicRow {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub updated_at: OffsetDateTime,
}

/// Product record.
///
/// `status` is stored as plain text: the bulk-import path inserts it
/// verbatim, so the column carries no enumeration constraint.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    pub status: String,
    pub category_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Product record joined with its category's name, as returned by
/// listings.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithCategory {
    pub id: i64,
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    pub status: String,
    pub category_id: i64,
    pub category_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Input for product creation and bulk import.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    pub status: String,
    pub category_id: i64,
    /// Characteristics to link through the join table. Always empty on
    /// the bulk-import path (the file format carries none).
    pub characteristic_ids: Vec<i64>,
}

impl From<ImportRecord> for NewProduct {
    fn from(record: ImportRecord) -> Self {
        Self {
            name: record.name,
            cost: record.cost,
            quantity: record.quantity,
            status: record.status,
            category_id: record.category_id,
            characteristic_ids: Vec::new(),
        }
    }
}
