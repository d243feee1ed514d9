//! In-memory storage implementation for the transaction ledger.

mod repository;
