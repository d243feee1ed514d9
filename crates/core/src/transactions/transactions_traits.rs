//! Transaction repository contract.
//!
//! The ledger is append-only: the trait has no update or delete operation.

use async_trait::async_trait;
use uuid::Uuid;

use super::transactions_model::Transaction;
use crate::errors::Result;

/// Trait defining the contract for ledger persistence.
///
/// Implementations must make the version check and the append a single
/// atomic step so two writers validated against the same history cannot
/// both succeed.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Appends `transaction` to its portfolio's ledger.
    ///
    /// `expected_version` is the portfolio version the caller validated
    /// against. The append fails with `DatabaseError::ConcurrentModification`
    /// if the portfolio has moved on, and with `DatabaseError::UniqueViolation`
    /// if the id is already present. On success the portfolio version is
    /// incremented.
    async fn append(&self, transaction: Transaction, expected_version: u64)
        -> Result<Transaction>;

    /// Lists a portfolio's ledger ordered by timestamp ascending, with equal
    /// timestamps in insertion order.
    fn list_by_portfolio(&self, portfolio_id: Uuid) -> Result<Vec<Transaction>>;
}
