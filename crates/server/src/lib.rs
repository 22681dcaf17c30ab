//! HTTP API server for the stockroom inventory backend.
//!
//! This crate provides the HTTP surface:
//! - Product listing with typed query filters
//! - Product read/create
//! - Transactional quantity adjustment
//! - Bulk product import from an uploaded delimited file
//! - Category and characteristic prefix listings

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
