//! Bulk product import from an uploaded delimited file.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use stockroom_core::import::parse_lines;
use stockroom_store::models::NewProduct;

/// PUT /products_admin/{id}/upload - Import products from a multipart
/// `file` field, one `;`-delimited record per line.
///
/// The whole file commits or none of it does: parsing fails on the
/// first bad line before any store call, and insertion runs inside a
/// single store transaction. The multipart stream is fully consumed on
/// every exit path, so the request body is always released.
pub async fn upload_products(
    State(state): State<AppState>,
    Path(_id): Path<i64>,
    mut multipart: Multipart,
) -> ApiResult<StatusCode> {
    let mut file_contents: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {e}")))?;
            file_contents = Some(data.to_vec());
        }
        // Other fields are drained and ignored.
    }

    let Some(bytes) = file_contents else {
        return Err(ApiError::FileMissing);
    };
    let text = String::from_utf8(bytes)
        .map_err(|_| ApiError::BadRequest("file must be UTF-8 text".to_string()))?;

    let records = parse_lines(&text)?;
    let batch: Vec<NewProduct> = records.into_iter().map(NewProduct::from).collect();
    let inserted = state.store.import_products(&batch).await?;

    tracing::info!(rows = inserted, "import file applied");
    Ok(StatusCode::OK)
}
