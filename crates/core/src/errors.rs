//! Core error types for the paper trading ledger.
//!
//! This module defines storage-agnostic error types. Storage implementations
//! convert their own failures into [`DatabaseError`] before returning them.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::transactions::TransactionError;
use crate::values::ValueError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
///
/// Every fallible operation in the crate returns this type. The variants map
/// one-to-one onto the failure categories: invalid values, invalid entities,
/// business-rule violations raised by orchestration, calculation input
/// problems, and storage failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value: {0}")]
    Value(#[from] ValueError),

    #[error("Invalid transaction: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Business rule violated: {0}")]
    BusinessRule(#[from] BusinessRuleError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Storage-agnostic error type for repository operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate id).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// The record changed between read and write.
    #[error("Concurrent modification of {entity}: expected version {expected}, found {actual}")]
    ConcurrentModification {
        entity: String,
        expected: u64,
        actual: u64,
    },

    /// Internal/unexpected storage error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors raised while deriving state from a ledger.
///
/// The calculator never fails on an inconsistent history; it only fails when
/// the caller hands it inputs it cannot value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("No current price supplied for held ticker {0}")]
    MissingPrice(String),

    #[error("Currency mismatch in ledger: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },
}

/// Business-rule violations detected by the orchestration layer after
/// consulting the calculator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessRuleError {
    #[error("Insufficient funds: available {available} {currency}, required {required} {currency}")]
    InsufficientFunds {
        currency: String,
        available: Decimal,
        required: Decimal,
    },

    #[error("Insufficient shares of {ticker}: available {available}, required {required}")]
    InsufficientShares {
        ticker: String,
        available: Decimal,
        required: Decimal,
    },

    #[error("Portfolio {portfolio_id} uses {expected}, request is in {found}")]
    WrongCurrency {
        portfolio_id: String,
        expected: String,
        found: String,
    },
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),

    #[error("Failed to parse identifier: {0}")]
    IdParse(#[from] uuid::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::Validation(ValidationError::IdParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
