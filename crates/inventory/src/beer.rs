use core::str::FromStr;

use serde::{Deserialize, Serialize};

use beerstock_core::{BeerId, DomainError, DomainResult};

/// Style of a stocked beer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerType {
    Lager,
    Malzbier,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
}

impl BeerType {
    pub const ALL: [BeerType; 7] = [
        BeerType::Lager,
        BeerType::Malzbier,
        BeerType::Witbier,
        BeerType::Weiss,
        BeerType::Ale,
        BeerType::Ipa,
        BeerType::Stout,
    ];

    /// Wire/storage representation (`"LAGER"`, `"IPA"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            BeerType::Lager => "LAGER",
            BeerType::Malzbier => "MALZBIER",
            BeerType::Witbier => "WITBIER",
            BeerType::Weiss => "WEISS",
            BeerType::Ale => "ALE",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "STOUT",
        }
    }
}

impl core::fmt::Display for BeerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown beer type: {s}")))
    }
}

/// A beer that has not been stored yet (no identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBeer {
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
    pub quantity: u32,
    pub max: u32,
}

impl NewBeer {
    /// Check the stock bound before the beer is handed to a store.
    pub fn ensure_within_capacity(&self) -> DomainResult<()> {
        if self.quantity > self.max {
            return Err(DomainError::validation(format!(
                "quantity {} exceeds max {}",
                self.quantity, self.max
            )));
        }
        Ok(())
    }

    /// Attach the store-assigned identifier.
    pub fn with_id(self, id: BeerId) -> Beer {
        Beer {
            id,
            name: self.name,
            brand: self.brand,
            beer_type: self.beer_type,
            quantity: self.quantity,
            max: self.max,
        }
    }
}

/// A stored beer.
///
/// Invariant: `quantity <= max`. Quantity only changes through
/// [`Beer::increment`] and [`Beer::decrement`], which return a new value and
/// leave `self` untouched on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beer {
    pub id: BeerId,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
    pub quantity: u32,
    pub max: u32,
}

impl Beer {
    /// Quantity after adding `amount`, bounded above by `max` (inclusive).
    pub fn increment(&self, amount: u32) -> DomainResult<Beer> {
        let quantity = self
            .quantity
            .checked_add(amount)
            .filter(|q| *q <= self.max)
            .ok_or_else(|| {
                DomainError::capacity_exceeded(format!(
                    "beer {} with quantity {} cannot take {} more (max {})",
                    self.id, self.quantity, amount, self.max
                ))
            })?;

        Ok(Beer {
            quantity,
            ..self.clone()
        })
    }

    /// Quantity after removing `amount`, bounded below by zero (inclusive).
    pub fn decrement(&self, amount: u32) -> DomainResult<Beer> {
        let quantity = self.quantity.checked_sub(amount).ok_or_else(|| {
            DomainError::capacity_exceeded(format!(
                "beer {} with quantity {} cannot release {}",
                self.id, self.quantity, amount
            ))
        })?;

        Ok(Beer {
            quantity,
            ..self.clone()
        })
    }
}
