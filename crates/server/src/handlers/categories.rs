//! Category handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use stockroom_store::models::CategoryRow;

/// Optional name-prefix filter for catalog listings.
#[derive(Debug, Deserialize)]
pub struct NamePrefixQuery {
    pub name: Option<String>,
}

/// Creation request for catalog entries.
#[derive(Debug, Deserialize)]
pub struct CreateNameRequest {
    pub name: String,
}

/// GET /categories - List categories, optionally by name prefix, in
/// insertion order.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<NamePrefixQuery>,
) -> ApiResult<Json<Vec<CategoryRow>>> {
    let rows = state.store.list_categories(query.name.as_deref()).await?;
    Ok(Json(rows))
}

/// POST /categories - Create a category (administrative surface).
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateNameRequest>,
) -> ApiResult<(StatusCode, Json<CategoryRow>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    let row = state.store.create_category(&body.name).await?;
    tracing::info!(category_id = row.id, name = %row.name, "category created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /categories/{id} - Remove a category (administrative
/// surface). Fails with a conflict while any product references it.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_category(id).await?;
    tracing::info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
