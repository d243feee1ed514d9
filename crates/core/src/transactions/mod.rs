//! Transactions module - the immutable ledger entry, its invariants and the
//! persistence contract.

mod transactions_constants;
mod transactions_errors;
mod transactions_model;
mod transactions_traits;


pub use transactions_constants::*;
pub use transactions_errors::TransactionError;
pub use transactions_model::{
    chronological, sort_chronologically, trade_value, NewTransaction, Transaction,
    TransactionType,
};
pub use transactions_traits::TransactionRepositoryTrait;
