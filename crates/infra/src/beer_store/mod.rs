//! Record store boundary for stocked beers.
//!
//! This module defines the persistence port used by the `StockManager` plus
//! two implementations: an in-memory map (dev/tests) and Postgres (sqlx).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryBeerStore;
pub use postgres::PostgresBeerStore;
pub use r#trait::{BeerStore, StoreError};
