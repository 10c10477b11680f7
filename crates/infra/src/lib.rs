//! Infrastructure layer: record stores and stock orchestration.

pub mod beer_store;
pub mod stock_manager;


pub use beer_store::{BeerStore, InMemoryBeerStore, PostgresBeerStore, StoreError};
pub use stock_manager::{StockError, StockManager};
