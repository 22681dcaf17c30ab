//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let max_import_bytes = state.config.server.max_import_bytes;

    Router::new()
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/health", get(handlers::health_check))
        // Product read surface
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/products/{id}", get(handlers::get_product))
        .route(
            "/products/{id}/update_quantity",
            patch(handlers::update_quantity),
        )
        // Bulk import. The {id} segment is accepted and unused;
        // existing clients send it because the admin route was shaped
        // as a per-product detail action.
        .route(
            "/products_admin/{id}/upload",
            put(handlers::upload_products).layer(DefaultBodyLimit::max(max_import_bytes)),
        )
        // Catalog listings
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/categories/{id}", delete(handlers::delete_category))
        .route(
            "/characteristics",
            get(handlers::list_characteristics).post(handlers::create_characteristic),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
