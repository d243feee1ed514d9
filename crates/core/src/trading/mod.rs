//! Trading module - use cases that turn requests into ledger entries.
//!
//! Each command loads the portfolio, replays its history, checks business
//! rules, builds the new transaction and appends it against the portfolio
//! version it read. Queries only replay.

mod trading_service;
mod trading_traits;

#[cfg(test)]
mod trading_service_tests;

pub use trading_service::TradingService;
pub use trading_traits::TradingServiceTrait;
