use async_trait::async_trait;
use log::{debug, warn};
use uuid::Uuid;

use papertrade_core::errors::{DatabaseError, Result};
use papertrade_core::transactions::{
    sort_chronologically, Transaction, TransactionRepositoryTrait,
};

use crate::store::InMemoryStore;

#[async_trait]
impl TransactionRepositoryTrait for InMemoryStore {
    async fn append(&self, transaction: Transaction, expected_version: u64) -> Result<Transaction> {
        let mut state = self.write()?;
        let portfolio_id = transaction.portfolio_id();
        let portfolio = state.portfolios.get(&portfolio_id).ok_or_else(|| {
            DatabaseError::NotFound(format!("Portfolio {} not found", portfolio_id))
        })?;

        if portfolio.version() != expected_version {
            warn!(
                "Rejecting append to portfolio {}: expected version {}, found {}",
                portfolio_id,
                expected_version,
                portfolio.version()
            );
            return Err(DatabaseError::ConcurrentModification {
                entity: format!("portfolio {}", portfolio_id),
                expected: expected_version,
                actual: portfolio.version(),
            }
            .into());
        }
        if state.transaction_ids.contains(&transaction.id()) {
            return Err(DatabaseError::UniqueViolation(format!(
                "Transaction {} already exists",
                transaction.id()
            ))
            .into());
        }

        let bumped = portfolio.next_version();
        debug!(
            "Appending {} to portfolio {} (version {} -> {})",
            transaction.transaction_type(),
            portfolio_id,
            expected_version,
            bumped.version()
        );
        state.portfolios.insert(portfolio_id, bumped);
        state.transaction_ids.insert(transaction.id());
        state
            .ledgers
            .entry(portfolio_id)
            .or_default()
            .push(transaction.clone());
        Ok(transaction)
    }

    fn list_by_portfolio(&self, portfolio_id: Uuid) -> Result<Vec<Transaction>> {
        let mut ledger = self
            .read()?
            .ledgers
            .get(&portfolio_id)
            .cloned()
            .unwrap_or_default();
        sort_chronologically(&mut ledger);
        Ok(ledger)
    }
}
