use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger entry invariants violated at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("{transaction_type} requires a {expected} cash change, got {actual}")]
    InvalidCashChange {
        transaction_type: String,
        expected: &'static str,
        actual: Decimal,
    },

    #[error("{transaction_type} requires field '{field}'")]
    MissingTradeField {
        transaction_type: String,
        field: &'static str,
    },

    #[error("{transaction_type} must not carry field '{field}'")]
    UnexpectedTradeField {
        transaction_type: String,
        field: &'static str,
    },

    #[error("Cash change {actual} does not equal quantity * price ({expected})")]
    CashChangeMismatch { expected: Decimal, actual: Decimal },

    #[error("Trade value {quantity} * {price} is out of range")]
    TradeValueOverflow { quantity: Decimal, price: Decimal },

    #[error("Price currency {price_currency} differs from cash currency {cash_currency}")]
    CurrencyMismatch {
        cash_currency: String,
        price_currency: String,
    },

    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("Price per share must be greater than zero, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Timestamp {0} is in the future")]
    FutureTimestamp(DateTime<Utc>),

    #[error("Notes exceed {max} characters")]
    NotesTooLong { max: usize },

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),
}
