//! HTTP request handlers.

pub mod categories;
pub mod characteristics;
pub mod health;
pub mod imports;
pub mod products;

pub use categories::*;
pub use characteristics::*;
pub use health::*;
pub use imports::*;
pub use products::*;
