use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::rounding::RoundingPolicy;
use super::values_errors::ValueError;
use crate::constants::MONEY_DECIMAL_PLACES;

/// Normalizes a currency code to uppercase and checks it is three ASCII letters.
pub fn normalize_currency_code(code: &str) -> Result<String, ValueError> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValueError::InvalidCurrency(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Fixed two-place representation with an unsigned zero.
fn canonical(amount: Decimal) -> Decimal {
    let mut amount = if amount.is_zero() {
        Decimal::ZERO
    } else {
        amount
    };
    amount.rescale(MONEY_DECIMAL_PLACES);
    amount
}

/// An exact monetary amount in a single currency.
///
/// The amount never carries more than two fractional digits. `Money` has no
/// `PartialEq`/`PartialOrd`: comparing amounts in different currencies is an
/// error, so comparisons go through [`Money::checked_eq`] and [`Money::try_cmp`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MoneyRecord")]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    currency: String,
}

/// Unvalidated wire shape; deserialization goes through [`Money::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyRecord {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyRecord> for Money {
    type Error = ValueError;

    fn try_from(record: MoneyRecord) -> Result<Self, Self::Error> {
        Money::new(record.amount, &record.currency)
    }
}

impl Money {
    /// Creates an amount, rejecting more than two significant fractional digits.
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, ValueError> {
        let currency = normalize_currency_code(currency)?;
        if amount.normalize().scale() > MONEY_DECIMAL_PLACES {
            return Err(ValueError::TooManyDecimalPlaces {
                value: amount,
                max: MONEY_DECIMAL_PLACES,
            });
        }
        Ok(Self {
            amount: canonical(amount),
            currency,
        })
    }

    /// Creates an amount after rounding it to two places with `policy`.
    pub fn new_rounded(
        amount: Decimal,
        currency: &str,
        policy: RoundingPolicy,
    ) -> Result<Self, ValueError> {
        Self::new(policy.round(amount, MONEY_DECIMAL_PLACES), currency)
    }

    pub fn zero(currency: &str) -> Result<Self, ValueError> {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parses a decimal string such as `"1500.25"`.
    pub fn parse(amount: &str, currency: &str) -> Result<Self, ValueError> {
        let value = Decimal::from_str(amount.trim()).map_err(|e| ValueError::Parse {
            input: amount.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(value, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), ValueError> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(ValueError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            })
        }
    }

    pub fn add(&self, other: &Money) -> Result<Money, ValueError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| ValueError::OutOfRange(format!("{} + {}", self, other)))?;
        Money::new(sum, &self.currency)
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, ValueError> {
        self.ensure_same_currency(other)?;
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| ValueError::OutOfRange(format!("{} - {}", self, other)))?;
        Money::new(difference, &self.currency)
    }

    /// Multiplies by a scalar, rounding half-even back to two places.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, ValueError> {
        self.multiply_with(factor, RoundingPolicy::default())
    }

    pub fn multiply_with(
        &self,
        factor: Decimal,
        policy: RoundingPolicy,
    ) -> Result<Money, ValueError> {
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| ValueError::OutOfRange(format!("{} * {}", self, factor)))?;
        Money::new_rounded(product, &self.currency, policy)
    }

    /// Divides by a scalar, rounding half-even back to two places.
    pub fn divide(&self, divisor: Decimal) -> Result<Money, ValueError> {
        self.divide_with(divisor, RoundingPolicy::default())
    }

    pub fn divide_with(
        &self,
        divisor: Decimal,
        policy: RoundingPolicy,
    ) -> Result<Money, ValueError> {
        if divisor.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        let quotient = self
            .amount
            .checked_div(divisor)
            .ok_or_else(|| ValueError::OutOfRange(format!("{} / {}", self, divisor)))?;
        Money::new_rounded(quotient, &self.currency, policy)
    }

    pub fn negate(&self) -> Money {
        Money {
            amount: canonical(-self.amount),
            currency: self.currency.clone(),
        }
    }

    pub fn abs(&self) -> Money {
        Money {
            amount: canonical(self.amount.abs()),
            currency: self.currency.clone(),
        }
    }

    /// Equality that refuses to compare across currencies.
    pub fn checked_eq(&self, other: &Money) -> Result<bool, ValueError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount == other.amount)
    }

    /// Ordering that refuses to compare across currencies.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, ValueError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}
