//! Papertrade Core - ledger entities, calculator, and trading services.
//!
//! This crate contains the business logic of the paper trading ledger.
//! It is storage-agnostic and defines traits that are implemented
//! by the `storage-memory` crate.

pub mod calculator;
pub mod constants;
pub mod errors;
pub mod portfolios;
pub mod settings;
pub mod trading;
pub mod transactions;
pub mod validation;
pub mod values;

// Re-export the types most callers need
pub use calculator::{Holding, LedgerCalculator, PriceMap};
pub use transactions::{Transaction, TransactionType};
pub use values::{Money, Quantity, RoundingPolicy, Ticker};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
