//! Product handlers: listing with typed filters, single reads,
//! creation, and transactional quantity adjustment.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stockroom_core::{ProductFilter, ProductStatus};
use stockroom_store::models::{NewProduct, ProductWithCategory};

/// Category reference embedded in product responses.
#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub name: String,
}

/// Product response payload.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    pub status: String,
    pub category: CategoryRef,
}

impl From<ProductWithCategory> for ProductResponse {
    fn from(row: ProductWithCategory) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cost: row.cost,
            quantity: row.quantity,
            status: row.status,
            category: CategoryRef {
                name: row.category_name,
            },
        }
    }
}

/// GET /products - List products matching the query's filter
/// parameters, ordered by name ascending.
///
/// Unrecognized parameter names are ignored; malformed numeric bounds
/// are a 400, not a silent drop.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let filter = ProductFilter::from_query(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let rows = state.store.list_products(&filter).await?;
    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id} - Single product read.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let row = state
        .store
        .get_product_with_category(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;
    Ok(Json(row.into()))
}

/// Product creation request.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub cost: i64,
    pub quantity: i64,
    /// Defaults to AVAILABLE. Unlike the bulk-import path, creation
    /// validates the status against the enumeration.
    #[serde(default)]
    pub status: Option<String>,
    /// Category id.
    pub category: i64,
    /// Optional characteristic ids to link.
    #[serde(default)]
    pub characteristics: Vec<i64>,
}

/// POST /products - Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if body.cost < 0 {
        return Err(ApiError::BadRequest("cost must be >= 0".to_string()));
    }
    if body.quantity < 0 {
        return Err(ApiError::BadRequest("quantity must be >= 0".to_string()));
    }
    let status = match body.status.as_deref() {
        None => ProductStatus::default(),
        Some(s) => ProductStatus::parse(s)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown status '{s}'")))?,
    };

    let new = NewProduct {
        name: body.name,
        cost: body.cost,
        quantity: body.quantity,
        status: status.as_str().to_string(),
        category_id: body.category,
        characteristic_ids: body.characteristics,
    };
    let row = state.store.create_product(&new).await?;
    tracing::info!(product_id = row.id, name = %row.name, "product created");

    let full = state
        .store
        .get_product_with_category(row.id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("created product {} vanished", row.id)))?;
    Ok((StatusCode::CREATED, Json(full.into())))
}

/// Quantity adjustment request. `quantity` carries the signed delta;
/// it stays a raw JSON value so a missing field and a non-integer value
/// report distinct validation errors.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

/// PATCH /products/{id}/update_quantity - Apply a signed delta to a
/// product's quantity. A delta that would drive the quantity negative
/// fails with no side effect.
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateQuantityRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let delta = match body.quantity {
        None | Some(serde_json::Value::Null) => {
            return Err(ApiError::BadRequest("quantity missing".to_string()));
        }
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| ApiError::BadRequest("quantity must be an integer".to_string()))?,
        Some(_) => {
            return Err(ApiError::BadRequest(
                "quantity must be an integer".to_string(),
            ));
        }
    };

    let row = state.store.adjust_quantity(id, delta).await?;
    let full = state
        .store
        .get_product_with_category(row.id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("adjusted product {} vanished", row.id)))?;
    Ok(Json(full.into()))
}
