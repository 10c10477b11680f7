use serde::{Deserialize, Serialize};

use beerstock_inventory::{Beer, BeerType};

// -------------------------
// Request DTOs
// -------------------------
//
// Every field is optional so that a missing field is reported by
// `validation` as a field violation instead of a deserialization failure.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBeerRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub beer_type: Option<String>,
    pub quantity: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeerResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
    pub quantity: u32,
    pub max: u32,
}

impl From<Beer> for BeerResponse {
    fn from(beer: Beer) -> Self {
        Self {
            id: beer.id.get(),
            name: beer.name,
            brand: beer.brand,
            beer_type: beer.beer_type,
            quantity: beer.quantity,
            max: beer.max,
        }
    }
}
