//! Validation module - business rules checked against derived ledger state.
//!
//! Kept apart from [`crate::calculator`] so replay and audit tooling can use
//! the calculator without any rule enforcement.

mod trade_validator;


pub use trade_validator::TradeValidator;
