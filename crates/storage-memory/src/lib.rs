//! In-memory storage implementation for the paper trading ledger.
//!
//! This crate implements the repository traits defined in `papertrade-core`
//! on top of a single lock-protected store:
//! - Portfolios with their optimistic-concurrency version
//! - Append-only per-portfolio transaction ledgers
//! - JSON snapshots that re-validate every entry on load
//!
//! # Architecture
//!
//! ```text
//!   core (domain, services)
//!            │
//!            ▼
//!   storage-memory (this crate)
//!            │
//!            ▼
//!     RwLock<StoreState>
//! ```

pub mod errors;
pub mod store;

// Repository implementations
pub mod portfolios;
pub mod transactions;

pub use errors::StorageError;
pub use store::{InMemoryStore, StoreSnapshot};

// Re-export from papertrade-core for convenience
pub use papertrade_core::errors::{DatabaseError, Error, Result};
