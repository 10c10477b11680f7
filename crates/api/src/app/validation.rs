//! Field-level input validation.
//!
//! Runs before the stock manager is invoked and reports every violated field
//! at once, so a client can fix a request in a single round trip.

use serde::Serialize;

use beerstock_inventory::{BeerType, NewBeer};

use crate::app::dto::{CreateBeerRequest, QuantityRequest};

pub const MAX_TEXT_LEN: usize = 200;
/// Upper bound on the initial quantity of a new beer.
pub const MAX_INITIAL_QUANTITY: i64 = 100;
/// Upper bound on a beer's configured capacity.
pub const MAX_CAPACITY: i64 = 500;
/// Bounds on a single increment/decrement, independent of any beer's max.
pub const MIN_AMOUNT: i64 = 1;
pub const MAX_AMOUNT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    fn text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.push(field, "is required");
                None
            }
            Some(v) if v.trim().is_empty() => {
                self.push(field, "must not be empty");
                None
            }
            Some(v) if v.chars().count() > MAX_TEXT_LEN => {
                self.push(field, format!("must be at most {MAX_TEXT_LEN} characters"));
                None
            }
            Some(v) => Some(v),
        }
    }

    fn ranged(&mut self, field: &'static str, value: Option<i64>, min: i64, max: i64) -> Option<u32> {
        match value {
            None => {
                self.push(field, "is required");
                None
            }
            Some(v) if v < min || v > max => {
                self.push(field, format!("must be between {min} and {max}"));
                None
            }
            // In range, so the conversion cannot fail.
            Some(v) => u32::try_from(v).ok(),
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, Vec<FieldViolation>> {
        match value {
            Some(v) if self.0.is_empty() => Ok(v),
            _ => Err(self.0),
        }
    }
}

/// Validate a create request and turn it into a domain `NewBeer`.
pub fn validate_create(req: CreateBeerRequest) -> Result<NewBeer, Vec<FieldViolation>> {
    let mut v = Violations::default();

    let name = v.text("name", req.name);
    let brand = v.text("brand", req.brand);
    let beer_type = match req.beer_type {
        None => {
            v.push("type", "is required");
            None
        }
        Some(raw) => match raw.parse::<BeerType>() {
            Ok(t) => Some(t),
            Err(_) => {
                let allowed: Vec<&str> = BeerType::ALL.iter().map(|t| t.as_str()).collect();
                v.push("type", format!("must be one of: {}", allowed.join(", ")));
                None
            }
        },
    };
    let quantity = v.ranged("quantity", req.quantity, 0, MAX_INITIAL_QUANTITY);
    let max = v.ranged("max", req.max, 0, MAX_CAPACITY);

    if let (Some(quantity), Some(max)) = (quantity, max) {
        if quantity > max {
            v.push("quantity", format!("must not exceed max ({max})"));
        }
    }

    let beer = match (name, brand, beer_type, quantity, max) {
        (Some(name), Some(brand), Some(beer_type), Some(quantity), Some(max)) => Some(NewBeer {
            name,
            brand,
            beer_type,
            quantity,
            max,
        }),
        _ => None,
    };
    v.finish(beer)
}

/// Validate the amount of an increment/decrement request.
pub fn validate_quantity(req: QuantityRequest) -> Result<u32, Vec<FieldViolation>> {
    let mut v = Violations::default();
    let amount = v.ranged("quantity", req.quantity, MIN_AMOUNT, MAX_AMOUNT);
    v.finish(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBeerRequest {
        CreateBeerRequest {
            name: Some("Brahma".to_string()),
            brand: Some("Ambev".to_string()),
            beer_type: Some("LAGER".to_string()),
            quantity: Some(10),
            max: Some(50),
        }
    }

    fn fields(violations: &[FieldViolation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn valid_request_becomes_new_beer() {
        let beer = validate_create(valid_request()).unwrap();
        assert_eq!(beer.name, "Brahma");
        assert_eq!(beer.beer_type, BeerType::Lager);
        assert_eq!(beer.quantity, 10);
        assert_eq!(beer.max, 50);
    }

    #[test]
    fn empty_request_reports_every_field() {
        let violations = validate_create(CreateBeerRequest::default()).unwrap_err();
        assert_eq!(fields(&violations), vec!["name", "brand", "type", "quantity", "max"]);
        assert!(violations.iter().all(|v| v.message == "is required"));
    }

    #[test]
    fn blank_and_oversized_text_is_rejected() {
        let req = CreateBeerRequest {
            name: Some("   ".to_string()),
            brand: Some("b".repeat(MAX_TEXT_LEN + 1)),
            ..valid_request()
        };
        let violations = validate_create(req).unwrap_err();
        assert_eq!(fields(&violations), vec!["name", "brand"]);
    }

    #[test]
    fn unknown_type_lists_allowed_values() {
        let req = CreateBeerRequest {
            beer_type: Some("PILSEN".to_string()),
            ..valid_request()
        };
        let violations = validate_create(req).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "type");
        assert!(violations[0].message.contains("LAGER"));
    }

    #[test]
    fn numeric_bounds_are_enforced() {
        let req = CreateBeerRequest {
            quantity: Some(-1),
            max: Some(MAX_CAPACITY + 1),
            ..valid_request()
        };
        assert_eq!(fields(&validate_create(req).unwrap_err()), vec!["quantity", "max"]);

        let req = CreateBeerRequest {
            quantity: Some(MAX_INITIAL_QUANTITY + 1),
            ..valid_request()
        };
        assert_eq!(fields(&validate_create(req).unwrap_err()), vec!["quantity"]);
    }

    #[test]
    fn quantity_above_max_is_rejected() {
        let req = CreateBeerRequest {
            quantity: Some(60),
            max: Some(50),
            ..valid_request()
        };
        let violations = validate_create(req).unwrap_err();
        assert_eq!(fields(&violations), vec!["quantity"]);
        assert!(violations[0].message.contains("max"));
    }

    #[test]
    fn amount_must_be_between_one_and_one_hundred() {
        assert_eq!(validate_quantity(QuantityRequest { quantity: Some(1) }).unwrap(), 1);
        assert_eq!(validate_quantity(QuantityRequest { quantity: Some(100) }).unwrap(), 100);

        for bad in [None, Some(0), Some(-5), Some(101)] {
            let violations = validate_quantity(QuantityRequest { quantity: bad }).unwrap_err();
            assert_eq!(fields(&violations), vec!["quantity"], "amount {bad:?}");
        }
    }
}
