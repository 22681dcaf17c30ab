//! Integration tests for the all-or-nothing bulk product import.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request, multipart_request};

async fn product_count(server: &TestServer) -> usize {
    let (status, body) = json_request(&server.router, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().len()
}

#[tokio::test]
async fn well_formed_file_inserts_every_line() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!(
        "Red Shoe;50;10;AVAILABLE;{id}\nBlue Hat;20;5;ON_HOLD;{id}\n",
        id = category.id
    );
    let (status, _) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = json_request(&server.router, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Blue Hat");
    assert_eq!(products[0]["cost"], 20);
    assert_eq!(products[0]["quantity"], 5);
    assert_eq!(products[0]["status"], "ON_HOLD");
    assert_eq!(products[1]["name"], "Red Shoe");
    assert_eq!(products[1]["category"]["name"], "Footwear");
}

#[tokio::test]
async fn malformed_line_aborts_the_whole_file() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    // Second line is missing a field.
    let contents = format!(
        "Red Shoe;50;10;AVAILABLE;{id}\nBlue Hat;20;5;ON_HOLD\n",
        id = category.id
    );
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_import");
    assert_eq!(body["message"], "incorrect line 2, please review file");
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn non_numeric_cost_aborts_the_whole_file() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!("Red Shoe;cheap;10;AVAILABLE;{}\n", category.id);
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_import");
    assert!(body["message"].as_str().unwrap().contains("cheap"));
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn negative_value_aborts_the_whole_file() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!("Red Shoe;-50;10;AVAILABLE;{}\n", category.id);
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("over 0"));
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn unknown_category_aborts_the_whole_file() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    // First line resolves, second references a category that does not exist.
    let contents = format!(
        "Red Shoe;50;10;AVAILABLE;{}\nBlue Hat;20;5;ON_HOLD;9999\n",
        category.id
    );
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "unresolved_reference");
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn duplicate_name_in_file_aborts_the_whole_file() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!(
        "Red Shoe;50;10;AVAILABLE;{id}\nRed Shoe;60;2;AVAILABLE;{id}\n",
        id = category.id
    );
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_exists");
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn status_is_stored_verbatim() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!("Odd Widget;1;1;SOMETHING_ELSE;{}\n", category.id);
    let (status, _) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = json_request(&server.router, "GET", "/products", None).await;
    assert_eq!(body[0]["status"], "SOMETHING_ELSE");
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let server = TestServer::new().await;

    let (status, body) =
        multipart_request(&server.router, "PUT", "/products_admin/1/upload", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "file_missing");
    assert_eq!(body["message"], "file wasn't uploaded");
}

#[tokio::test]
async fn wrongly_named_field_is_rejected() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!("Red Shoe;50;10;AVAILABLE;{}\n", category.id);
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("attachment", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "file_missing");
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn non_utf8_file_is_rejected() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let mut contents = format!("Red Shoe;50;10;AVAILABLE;{}\n", category.id).into_bytes();
    contents.extend_from_slice(&[0xff, 0xfe, 0x80]);
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", &contents)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("UTF-8"));
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn empty_file_imports_nothing() {
    let server = TestServer::new().await;

    let (status, _) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", &b""[..])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(product_count(&server).await, 0);
}

#[tokio::test]
async fn blank_line_is_reported_with_its_line_number() {
    let server = TestServer::new().await;
    let category = server.seed_category("Footwear").await;

    let contents = format!("Red Shoe;50;10;AVAILABLE;{}\n\nmore", category.id);
    let (status, body) = multipart_request(
        &server.router,
        "PUT",
        "/products_admin/1/upload",
        Some(("file", contents.as_bytes())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "incorrect line 2, please review file");
    assert_eq!(product_count(&server).await, 0);
}
