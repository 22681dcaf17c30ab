//! Entity store trait and SQLite implementation.

use crate::error::{DbViolation, StoreError, StoreResult, db_violation};
use crate::models::{CategoryRow, CharacteristicRow, NewProduct, ProductRow, ProductWithCategory};
use crate::repos::{CategoryRepo, CharacteristicRepo, ProductRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use stockroom_core::{ProductFilter, ProductParam};
use time::OffsetDateTime;

/// SQLite schema (embedded).
const SQLITE_SCHEMA: &str = include_str!("sqlite_schema.sql");

/// Combined entity store trait.
#[async_trait]
pub trait InventoryStore:
    ProductRepo + CategoryRepo + CharacteristicRepo + std::fmt::Debug + Send + Sync
{
    /// Run database migrations.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// Split an embedded schema into statements, skipping comment-only
/// fragments. Neither backend accepts multiple statements in a single
/// prepared statement.
pub(crate) fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// Escape LIKE wildcards in a prefix and append `%`, for use with
/// `LIKE ? ESCAPE '\'`. Keeps prefix matching literal when the value
/// itself contains `%` or `_`.
pub(crate) fn like_prefix(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// A value bound into dynamically assembled filter SQL.
pub(crate) enum Bind {
    Text(String),
    Int(i64),
}

const PRODUCT_COLUMNS: &str = "id, name, cost, quantity, status, category_id, created_at, updated_at";

const PRODUCT_JOIN_COLUMNS: &str = "p.id, p.name, p.cost, p.quantity, p.status, p.category_id, \
     c.name AS category_name, p.created_at, p.updated_at";

/// SQLite-based inventory store.
#[derive(Debug)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Config(format!("cannot create {parent:?}: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // SQLite LIKE is case-insensitive by default; prefix
            // matching is specified case-sensitive.
            .pragma("case_sensitive_like", "true")
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single
            // connection serializes concurrent quantity adjustments the
            // way row locks do on PostgreSQL.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        for statement in schema_statements(SQLITE_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Render the filter's predicates into a WHERE clause with `?`
/// placeholders plus the matching bind values, in order.
fn filter_conditions(filter: &ProductFilter) -> (String, Vec<Bind>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    for param in filter.params() {
        match param {
            ProductParam::NamePrefix(prefix) => {
                conditions.push("p.name LIKE ? ESCAPE '\\'".to_string());
                binds.push(Bind::Text(like_prefix(prefix)));
            }
            ProductParam::CategoryNamePrefix(prefix) => {
                conditions.push("c.name LIKE ? ESCAPE '\\'".to_string());
                binds.push(Bind::Text(like_prefix(prefix)));
            }
            ProductParam::MinCost(value) => {
                conditions.push("p.cost >= ?".to_string());
                binds.push(Bind::Int(*value));
            }
            ProductParam::MaxCost(value) => {
                conditions.push("p.cost <= ?".to_string());
                binds.push(Bind::Int(*value));
            }
            ProductParam::MinQuantity(value) => {
                conditions.push("p.quantity >= ?".to_string());
                binds.push(Bind::Int(*value));
            }
            ProductParam::MaxQuantity(value) => {
                conditions.push("p.quantity <= ?".to_string());
                binds.push(Bind::Int(*value));
            }
            ProductParam::StatusEq(status) => {
                conditions.push("p.status = ?".to_string());
                binds.push(Bind::Text(status.clone()));
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, binds)
}

#[async_trait]
impl ProductRepo for SqliteStore {
    async fn create_product(&self, new: &NewProduct) -> StoreResult<ProductRow> {
        let mut tx = self.pool.begin().await?;
        let now = OffsetDateTime::now_utc();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product (name, cost, quantity, status, category_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new.name)
        .bind(new.cost)
        .bind(new.quantity)
        .bind(&new.status)
        .bind(new.category_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match db_violation(&e) {
            Some(DbViolation::Unique) => {
                StoreError::AlreadyExists(format!("product '{}'", new.name))
            }
            Some(DbViolation::ForeignKey) => {
                StoreError::ForeignKey(format!("category {}", new.category_id))
            }
            None => e.into(),
        })?;

        for &characteristic_id in &new.characteristic_ids {
            sqlx::query(
                "INSERT INTO links_product_to_characteristic (product_id, characteristic_id) \
                 VALUES (?, ?)",
            )
            .bind(id)
            .bind(characteristic_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match db_violation(&e) {
                Some(DbViolation::ForeignKey) => {
                    StoreError::ForeignKey(format!("characteristic {characteristic_id}"))
                }
                _ => e.into(),
            })?;
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_product_with_category(
        &self,
        id: i64,
    ) -> StoreResult<Option<ProductWithCategory>> {
        let row = sqlx::query_as::<_, ProductWithCategory>(&format!(
            "SELECT {PRODUCT_JOIN_COLUMNS} FROM product p \
             JOIN category c ON c.id = p.category_id WHERE p.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> StoreResult<Vec<ProductWithCategory>> {
        let (where_clause, binds) = filter_conditions(filter);
        let sql = format!(
            "SELECT {PRODUCT_JOIN_COLUMNS} FROM product p \
             JOIN category c ON c.id = p.category_id {where_clause} ORDER BY p.name ASC"
        );

        let mut query = sqlx::query_as::<_, ProductWithCategory>(&sql);
        for bind in &binds {
            query = match bind {
                Bind::Text(value) => query.bind(value.as_str()),
                Bind::Int(value) => query.bind(*value),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn adjust_quantity(&self, id: i64, delta: i64) -> StoreResult<ProductRow> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;

        // Transaction drops on the error path, rolling back with no
        // mutation. An overflowing sum is as unrepresentable as a
        // negative one.
        let new_quantity = match product.quantity.checked_add(delta) {
            Some(quantity) if quantity >= 0 => quantity,
            _ => {
                return Err(StoreError::InsufficientStock {
                    available: product.quantity,
                    delta,
                });
            }
        };

        let now = OffsetDateTime::now_utc();
        sqlx::query("UPDATE product SET quantity = ?, updated_at = ? WHERE id = ?")
            .bind(new_quantity)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(product_id = id, delta, new_quantity, "quantity adjusted");
        Ok(ProductRow {
            quantity: new_quantity,
            updated_at: now,
            ..product
        })
    }

    async fn import_products(&self, records: &[NewProduct]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let now = OffsetDateTime::now_utc();
        let mut inserted = 0u64;

        for record in records {
            sqlx::query(
                "INSERT INTO product (name, cost, quantity, status, category_id, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&record.name)
            .bind(record.cost)
            .bind(record.quantity)
            .bind(&record.status)
            .bind(record.category_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| match db_violation(&e) {
                Some(DbViolation::Unique) => {
                    StoreError::AlreadyExists(format!("product '{}'", record.name))
                }
                Some(DbViolation::ForeignKey) => {
                    StoreError::ForeignKey(format!("category {}", record.category_id))
                }
                None => e.into(),
            })?;
            inserted += 1;
        }

        tx.commit().await?;
        tracing::info!(rows = inserted, "bulk import committed");
        Ok(inserted)
    }

    async fn product_characteristics(&self, id: i64) -> StoreResult<Vec<CharacteristicRow>> {
        let rows = sqlx::query_as::<_, CharacteristicRow>(
            "SELECT ch.id, ch.name, ch.created_at, ch.updated_at FROM characteristic ch \
             JOIN links_product_to_characteristic l ON l.characteristic_id = ch.id \
             WHERE l.product_id = ? ORDER BY ch.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CategoryRepo for SqliteStore {
    async fn create_category(&self, name: &str) -> StoreResult<CategoryRow> {
        let now = OffsetDateTime::now_utc();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO category (name, created_at, updated_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match db_violation(&e) {
            Some(DbViolation::Unique) => StoreError::AlreadyExists(format!("category '{name}'")),
            _ => e.into(),
        })?;

        Ok(CategoryRow {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<CategoryRow>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, created_at, updated_at FROM category WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_categories(&self, name_prefix: Option<&str>) -> StoreResult<Vec<CategoryRow>> {
        let rows = match name_prefix {
            Some(prefix) => {
                sqlx::query_as::<_, CategoryRow>(
                    "SELECT id, name, created_at, updated_at FROM category \
                     WHERE name LIKE ? ESCAPE '\\' ORDER BY id",
                )
                .bind(like_prefix(prefix))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "SELECT id, name, created_at, updated_at FROM category ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match db_violation(&e) {
                Some(DbViolation::ForeignKey) => StoreError::ForeignKey(format!(
                    "category {id} is referenced by existing products"
                )),
                _ => e.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("category {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CharacteristicRepo for SqliteStore {
    async fn create_characteristic(&self, name: &str) -> StoreResult<CharacteristicRow> {
        let now = OffsetDateTime::now_utc();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO characteristic (name, created_at, updated_at) VALUES (?, ?, ?) \
             RETURNING id",
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(CharacteristicRow {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_characteristics(
        &self,
        name_prefix: Option<&str>,
    ) -> StoreResult<Vec<CharacteristicRow>> {
        let rows = match name_prefix {
            Some(prefix) => {
                sqlx::query_as::<_, CharacteristicRow>(
                    "SELECT id, name, created_at, updated_at FROM characteristic \
                     WHERE name LIKE ? ESCAPE '\\' ORDER BY id",
                )
                .bind(like_prefix(prefix))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CharacteristicRow>(
                    "SELECT id, name, created_at, updated_at FROM characteristic ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
