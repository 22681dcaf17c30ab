//! PostgreSQL-based inventory store implementation.

use crate::error::{DbViolation, StoreError, StoreResult, db_violation};
use crate::models::{CategoryRow, CharacteristicRow, NewProduct, ProductRow, ProductWithCategory};
use crate::repos::{CategoryRepo, CharacteristicRepo, ProductRepo};
use crate::store::{Bind, InventoryStore, like_prefix, schema_statements};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use stockroom_core::{ProductFilter, ProductParam};
use time::OffsetDateTime;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

const PRODUCT_COLUMNS: &str = "id, name, cost, quantity, status, category_id, created_at, updated_at";

const PRODUCT_JOIN_COLUMNS: &str = "p.id, p.name, p.cost, p.quantity, p.status, p.category_id, \
     c.name AS category_name, p.created_at, p.updated_at";

/// PostgreSQL-based inventory store.
#[derive(Debug)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection
    /// parameters, so credentials can come from the environment
    /// instead of a URL in a config file.
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }
        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        // Log connection info without password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            "Connecting to PostgreSQL"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> StoreResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{}ms", timeout_ms))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl InventoryStore for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        // PostgreSQL doesn't allow multiple statements in a single
        // prepared statement, so the schema runs statement by statement.
        for statement in schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Render the filter's predicates into a WHERE clause with `$n`
/// placeholders plus the matching bind values, in order.
fn filter_conditions(filter: &ProductFilter) -> (String, Vec<Bind>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    let mut bind_idx = 1usize;

    for param in filter.params() {
        match param {
            ProductParam::NamePrefix(prefix) => {
                conditions.push(format!("p.name LIKE ${bind_idx} ESCAPE '\\'"));
                binds.push(Bind::Text(like_prefix(prefix)));
            }
            ProductParam::CategoryNamePrefix(prefix) => {
                conditions.push(format!("c.name LIKE ${bind_idx} ESCAPE '\\'"));
                binds.push(Bind::Text(like_prefix(prefix)));
            }
            ProductParam::MinCost(value) => {
                conditions.push(format!("p.cost >= ${bind_idx}"));
                binds.push(Bind::Int(*value));
            }
            ProductParam::MaxCost(value) => {
                conditions.push(format!("p.cost <= ${bind_idx}"));
                binds.push(Bind::Int(*value));
            }
            ProductParam::MinQuantity(value) => {
                conditions.push(format!("p.quantity >= ${bind_idx}"));
                binds.push(Bind::Int(*value));
            }
            ProductParam::MaxQuantity(value) => {
                conditions.push(format!("p.quantity <= ${bind_idx}"));
                binds.push(Bind::Int(*value));
            }
            ProductParam::StatusEq(status) => {
                conditions.push(format!("p.status = ${bind_idx}"));
                binds.push(Bind::Text(status.clone()));
            }
        }
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, binds)
}

#[async_trait]
impl ProductRepo for PostgresStore {
    async fn create_product(&self, new: &NewProduct) -> StoreResult<ProductRow> {
        let mut tx = self.pool.begin().await?;
        let now = OffsetDateTime::now_utc();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product (name, cost, quantity, status, category_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
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
                 VALUES ($1, $2)",
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
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
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
             JOIN category c ON c.id = p.category_id WHERE p.id = $1"
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

        // Row lock so concurrent adjustments to the same product
        // serialize instead of losing updates.
        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1 FOR UPDATE"
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
        sqlx::query("UPDATE product SET quantity = $1, updated_at = $2 WHERE id = $3")
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
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
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
             WHERE l.product_id = $1 ORDER BY ch.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CategoryRepo for PostgresStore {
    async fn create_category(&self, name: &str) -> StoreResult<CategoryRow> {
        let now = OffsetDateTime::now_utc();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO category (name, created_at, updated_at) VALUES ($1, $2, $3) \
             RETURNING id",
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
            "SELECT id, name, created_at, updated_at FROM category WHERE id = $1",
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
                     WHERE name LIKE $1 ESCAPE '\\' ORDER BY id",
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
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
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
impl CharacteristicRepo for PostgresStore {
    async fn create_characteristic(&self, name: &str) -> StoreResult<CharacteristicRow> {
        let now = OffsetDateTime::now_utc();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO characteristic (name, created_at, updated_at) VALUES ($1, $2, $3) \
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
                     WHERE name LIKE $1 ESCAPE '\\' ORDER BY id",
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
