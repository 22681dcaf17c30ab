//! Characteristic handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::categories::{CreateNameRequest, NamePrefixQuery};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use stockroom_store::models::CharacteristicRow;

/// GET /characteristics - List characteristics, optionally by name
/// prefix, in insertion order.
pub async fn list_characteristics(
    State(state): State<AppState>,
    Query(query): Query<NamePrefixQuery>,
) -> ApiResult<Json<Vec<CharacteristicRow>>> {
    let rows = state
        .store
        .list_characteristics(query.name.as_deref())
        .await?;
    Ok(Json(rows))
}

/// POST /characteristics - Create a characteristic (administrative
/// surface). Duplicate names are allowed.
pub async fn create_characteristic(
    State(state): State<AppState>,
    Json(body): Json<CreateNameRequest>,
) -> ApiResult<(StatusCode, Json<CharacteristicRow>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    let row = state.store.create_characteristic(&body.name).await?;
    tracing::info!(characteristic_id = row.id, name = %row.name, "characteristic created");
    Ok((StatusCode::CREATED, Json(row)))
}
