use async_trait::async_trait;
use uuid::Uuid;

use crate::calculator::{Holding, PortfolioValuation, PriceMap, RealizedGain};
use crate::errors::Result;
use crate::transactions::Transaction;
use crate::values::{Money, Quantity, Ticker};

/// Trait defining the contract for trading operations on a portfolio.
#[async_trait]
pub trait TradingServiceTrait: Send + Sync {
    /// Adds cash. `amount` must be positive and in the portfolio currency.
    async fn deposit(&self, portfolio_id: Uuid, amount: Money) -> Result<Transaction>;

    /// Removes cash, rejected with `InsufficientFunds` past the balance.
    async fn withdraw(&self, portfolio_id: Uuid, amount: Money) -> Result<Transaction>;

    /// Buys shares, rejected with `InsufficientFunds` when the cash balance
    /// cannot cover `quantity * price`.
    async fn buy(
        &self,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price: Money,
    ) -> Result<Transaction>;

    /// Sells shares, rejected with `InsufficientShares` past the holding.
    async fn sell(
        &self,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price: Money,
    ) -> Result<Transaction>;

    fn get_cash_balance(&self, portfolio_id: Uuid) -> Result<Money>;

    fn get_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>>;

    fn get_holding(&self, portfolio_id: Uuid, ticker: &Ticker) -> Result<Option<Holding>>;

    /// Values the portfolio. Every held ticker needs an entry in `prices`.
    fn get_portfolio_value(&self, portfolio_id: Uuid, prices: &PriceMap)
        -> Result<PortfolioValuation>;

    fn get_realized_gains(&self, portfolio_id: Uuid) -> Result<Vec<RealizedGain>>;

    /// The ledger in chronological order.
    fn get_transactions(&self, portfolio_id: Uuid) -> Result<Vec<Transaction>>;
}
