//! Infrastructure layer: storage adapters for the product catalog.
//!
//! Everything here sits behind the [`store::ProductStore`] trait so the HTTP
//! layer and tests never touch a concrete backend directly.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryProductStore;
pub use postgres::PgProductStore;
pub use store::{ProductStore, StoreError};
