//! Repository traits for inventory operations.

pub mod categories;
pub mod characteristics;
pub mod products;

pub use categories::CategoryRepo;
pub use characteristics::CharacteristicRepo;
pub use products::ProductRepo;
