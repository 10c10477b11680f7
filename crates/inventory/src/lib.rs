//! Beer stock domain module.
//!
//! This crate contains the business rules for stocked beers, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod beer;

pub use beer::{Beer, BeerType, NewBeer};
