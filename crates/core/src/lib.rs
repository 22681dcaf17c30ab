//! Core domain types and shared logic for the stockroom inventory backend.
//!
//! This crate defines the pure (I/O-free) pieces used across the other
//! crates:
//! - Product status lifecycle values
//! - Typed query-filter parameters and their accumulator
//! - Bulk import line parsing and validation
//! - Configuration types

pub mod config;
pub mod filter;
pub mod import;
pub mod status;

pub use config::{AppConfig, ServerConfig, StoreConfig};
pub use filter::{FilterError, ProductFilter, ProductParam};
pub use import::{ImportError, ImportRecord};
pub use status::ProductStatus;

/// Field delimiter for bulk import files.
pub const IMPORT_SEPARATOR: char = ';';

/// Number of fields in a bulk import record:
/// `name;cost;quantity;status;category_id`.
pub const IMPORT_FIELD_COUNT: usize = 5;
