//! Calculator module - pure derivation of cash, holdings and value from a
//! transaction ledger.
//!
//! Nothing here enforces business rules. An inconsistent history (for example
//! a sell of more shares than were held) is replayed faithfully and produces a
//! best-effort result; rejecting such states is the job of
//! [`crate::validation`].

mod calculator_model;
mod ledger_calculator;


pub use calculator_model::{
    Holding, HoldingValuation, PortfolioHoldingsValue, PortfolioValuation, RealizedGain,
};
pub use ledger_calculator::{
    calculate_cash_balance, calculate_holding_for_ticker, calculate_holdings,
    calculate_portfolio_valuation, calculate_portfolio_value, calculate_realized_gains,
    calculate_total_value, LedgerCalculator, PriceMap,
};
