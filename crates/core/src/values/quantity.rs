use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::values_errors::ValueError;
use crate::constants::QUANTITY_DECIMAL_PLACES;

/// A non-negative share count with up to four fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Result<Self, ValueError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValueError::NegativeQuantity(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > QUANTITY_DECIMAL_PLACES {
            return Err(ValueError::TooManyDecimalPlaces {
                value,
                max: QUANTITY_DECIMAL_PLACES,
            });
        }
        // `normalize` keeps a negative sign on zero; the canonical zero is unsigned.
        if normalized.is_zero() {
            return Ok(Self(Decimal::ZERO));
        }
        Ok(Self(normalized))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn parse(value: &str) -> Result<Self, ValueError> {
        let decimal = Decimal::from_str(value.trim()).map_err(|e| ValueError::Parse {
            input: value.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(decimal)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: Quantity) -> Result<Quantity, ValueError> {
        let sum = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| ValueError::OutOfRange(format!("{} + {}", self, other)))?;
        Quantity::new(sum)
    }

    /// Fails with `OutOfRange` rather than producing a negative quantity.
    pub fn subtract(&self, other: Quantity) -> Result<Quantity, ValueError> {
        if other.0 > self.0 {
            return Err(ValueError::OutOfRange(format!(
                "cannot subtract {} from {}",
                other, self
            )));
        }
        Quantity::new(self.0 - other.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = ValueError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl TryFrom<String> for Quantity {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Quantity::parse(&value)
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_string()
    }
}
