use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::Result;
use crate::values::{Money, Quantity, RoundingPolicy, Ticker, ValueError};

/// Shares of one ticker currently held, as derived from the ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    ticker: Ticker,
    quantity: Quantity,
    cost_basis: Money,
}

impl Holding {
    pub fn new(ticker: Ticker, quantity: Quantity, cost_basis: Money) -> Result<Self> {
        if cost_basis.is_negative() {
            return Err(ValueError::OutOfRange(format!(
                "cost basis of {} cannot be negative: {}",
                ticker, cost_basis
            ))
            .into());
        }
        Ok(Self {
            ticker,
            quantity,
            cost_basis,
        })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn cost_basis(&self) -> &Money {
        &self.cost_basis
    }

    /// Cost basis per share rounded half-even, `None` when nothing is held.
    pub fn average_cost(&self) -> Option<Money> {
        self.average_cost_with(RoundingPolicy::default())
    }

    pub fn average_cost_with(&self, rounding: RoundingPolicy) -> Option<Money> {
        if self.quantity.is_zero() {
            return None;
        }
        self.cost_basis
            .divide_with(self.quantity.value(), rounding)
            .ok()
    }
}

impl PartialEq for Holding {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

impl Eq for Holding {}

/// A holding marked to a current price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub holding: Holding,
    pub current_price: Money,
    pub market_value: Money,
    pub unrealized_gain: Money,
    /// Gain relative to cost basis, in percent. `None` for a zero cost basis.
    pub unrealized_gain_percent: Option<Decimal>,
}

/// Market value of a set of holdings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHoldingsValue {
    pub holdings: Vec<HoldingValuation>,
    pub total_market_value: Money,
    pub total_cost_basis: Money,
    pub total_unrealized_gain: Money,
}

/// Full picture of a portfolio: cash plus marked holdings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValuation>,
    pub holdings_value: Money,
    pub cash_balance: Money,
    pub total_value: Money,
    pub total_cost_basis: Money,
    pub total_unrealized_gain: Money,
}

/// Gain locked in by selling shares of one ticker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedGain {
    pub ticker: Ticker,
    pub proceeds: Money,
    pub cost_basis_sold: Money,
    pub realized_gain: Money,
}
