//! Shared state behind every repository implementation in this crate.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use papertrade_core::errors::Result;
use papertrade_core::portfolios::Portfolio;
use papertrade_core::transactions::Transaction;

use crate::errors::StorageError;

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) portfolios: HashMap<Uuid, Portfolio>,
    /// Per-portfolio ledgers in append order.
    pub(crate) ledgers: HashMap<Uuid, Vec<Transaction>>,
    pub(crate) transaction_ids: HashSet<Uuid>,
}

/// Thread-safe in-memory store for portfolios and their ledgers.
///
/// Cloning is cheap and every clone shares the same state. All writes take
/// one exclusive lock, so the version check, the append and the version bump
/// of a ledger write are a single atomic step.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

/// Serializable copy of a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub portfolios: Vec<Portfolio>,
    /// Every ledger entry, grouped by portfolio in append order.
    pub transactions: Vec<Transaction>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> std::result::Result<RwLockReadGuard<'_, StoreState>, StorageError> {
        Ok(self.state.read()?)
    }

    pub(crate) fn write(
        &self,
    ) -> std::result::Result<RwLockWriteGuard<'_, StoreState>, StorageError> {
        Ok(self.state.write()?)
    }

    /// Copies the current contents, portfolios oldest first.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let state = self.read()?;
        let mut portfolios: Vec<Portfolio> = state.portfolios.values().cloned().collect();
        portfolios.sort_by_key(|p| (p.created_at(), p.id()));
        let transactions = portfolios
            .iter()
            .filter_map(|p| state.ledgers.get(&p.id()))
            .flat_map(|ledger| ledger.iter().cloned())
            .collect();
        Ok(StoreSnapshot {
            portfolios,
            transactions,
        })
    }

    /// Rebuilds a store from a snapshot. Entries are appended in snapshot
    /// order; duplicate ids and entries for unknown portfolios are rejected.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut state = StoreState::default();
        for portfolio in snapshot.portfolios {
            let id = portfolio.id();
            if state.portfolios.insert(id, portfolio).is_some() {
                return Err(StorageError::InconsistentSnapshot(format!(
                    "duplicate portfolio {}",
                    id
                ))
                .into());
            }
            state.ledgers.insert(id, Vec::new());
        }
        for transaction in snapshot.transactions {
            if !state.transaction_ids.insert(transaction.id()) {
                return Err(StorageError::InconsistentSnapshot(format!(
                    "duplicate transaction {}",
                    transaction.id()
                ))
                .into());
            }
            let ledger = state
                .ledgers
                .get_mut(&transaction.portfolio_id())
                .ok_or_else(|| {
                    StorageError::InconsistentSnapshot(format!(
                        "transaction {} references unknown portfolio {}",
                        transaction.id(),
                        transaction.portfolio_id()
                    ))
                })?;
            ledger.push(transaction);
        }
        debug!(
            "Restored store with {} portfolios and {} transactions",
            state.portfolios.len(),
            state.transaction_ids.len()
        );
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let snapshot = self.snapshot()?;
        Ok(serde_json::to_string_pretty(&snapshot).map_err(StorageError::from)?)
    }

    /// Loads a store from JSON. Every portfolio and transaction is validated
    /// again while parsing.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json).map_err(StorageError::from)?;
        Self::from_snapshot(snapshot)
    }
}
