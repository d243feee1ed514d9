use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a value type refuses to exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Amount {value} has more than {max} decimal places")]
    TooManyDecimalPlaces { value: Decimal, max: u32 },

    #[error("Invalid currency code '{0}': expected three ASCII letters")]
    InvalidCurrency(String),

    #[error("Invalid ticker '{0}': expected 1 to 5 ASCII letters")]
    InvalidTicker(String),

    #[error("Quantity cannot be negative: {0}")]
    NegativeQuantity(Decimal),

    #[error("Result out of range: {0}")]
    OutOfRange(String),

    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}
