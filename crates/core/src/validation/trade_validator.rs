use log::debug;
use std::cmp::Ordering;

use crate::calculator::LedgerCalculator;
use crate::errors::{BusinessRuleError, Result};
use crate::transactions::Transaction;
use crate::values::{Money, Quantity, Ticker};

/// Checks a proposed cash movement or sale against a portfolio's history.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeValidator {
    calculator: LedgerCalculator,
}

impl TradeValidator {
    pub fn new(calculator: LedgerCalculator) -> Self {
        Self { calculator }
    }

    /// Fails with `InsufficientFunds` when the cash balance in `currency`
    /// is below `required`.
    pub fn ensure_sufficient_funds(
        &self,
        history: &[Transaction],
        currency: &str,
        required: &Money,
    ) -> Result<()> {
        let available = self.calculator.cash_balance(history, currency)?;
        debug!("Checking funds: available {}, required {}", available, required);
        if available.try_cmp(required)? == Ordering::Less {
            return Err(BusinessRuleError::InsufficientFunds {
                currency: available.currency().to_string(),
                available: available.amount(),
                required: required.amount(),
            }
            .into());
        }
        Ok(())
    }

    /// Fails with `InsufficientShares` when fewer than `required` shares of
    /// `ticker` are held.
    pub fn ensure_sufficient_shares(
        &self,
        history: &[Transaction],
        ticker: &Ticker,
        required: Quantity,
    ) -> Result<()> {
        let available = self
            .calculator
            .holding_for_ticker(history, ticker)
            .map(|holding| holding.quantity())
            .unwrap_or_else(Quantity::zero);
        debug!(
            "Checking shares of {}: available {}, required {}",
            ticker, available, required
        );
        if available < required {
            return Err(BusinessRuleError::InsufficientShares {
                ticker: ticker.to_string(),
                available: available.value(),
                required: required.value(),
            }
            .into());
        }
        Ok(())
    }
}
