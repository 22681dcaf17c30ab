//! Request helpers shared across test files.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

/// Boundary used by [`multipart_request`].
#[allow(dead_code)]
pub const BOUNDARY: &str = "stockroom-test-boundary";

/// Drive a JSON (or empty-body) request through the router and decode
/// the response body as JSON, `Null` when empty.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body_json)
}

/// Drive a multipart upload through the router. `file` carries the
/// field name and raw contents; `None` sends a multipart body with no
/// `file` field at all.
#[allow(dead_code)]
pub async fn multipart_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    file: Option<(&str, &[u8])>,
) -> (StatusCode, serde_json::Value) {
    let body = match file {
        Some((field_name, contents)) => {
            let mut body = format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field_name}\"; filename=\"products.txt\"\r\n\
                 Content-Type: text/plain\r\n\r\n"
            )
            .into_bytes();
            body.extend_from_slice(contents);
            body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
            body
        }
        None => format!("--{BOUNDARY}--\r\n").into_bytes(),
    };

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body_json)
}
