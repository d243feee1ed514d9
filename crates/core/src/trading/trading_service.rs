use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::trading_traits::TradingServiceTrait;
use crate::calculator::{Holding, LedgerCalculator, PortfolioValuation, PriceMap, RealizedGain};
use crate::errors::{BusinessRuleError, DatabaseError, Error, Result};
use crate::portfolios::{Portfolio, PortfolioRepositoryTrait};
use crate::settings::LedgerSettings;
use crate::transactions::{trade_value, Transaction, TransactionRepositoryTrait};
use crate::validation::TradeValidator;
use crate::values::{Money, Quantity, Ticker};

/// Service executing trades and cash movements against portfolios.
pub struct TradingService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    calculator: LedgerCalculator,
    validator: TradeValidator,
}

impl TradingService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        settings: &LedgerSettings,
    ) -> Self {
        let calculator = LedgerCalculator::from_settings(settings);
        Self {
            portfolio_repository,
            transaction_repository,
            calculator,
            validator: TradeValidator::new(calculator),
        }
    }

    fn load_portfolio(&self, portfolio_id: Uuid) -> Result<Portfolio> {
        self.portfolio_repository
            .get_by_id(portfolio_id)?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "Portfolio {} not found",
                    portfolio_id
                )))
            })
    }

    fn load_history(&self, portfolio: &Portfolio) -> Result<Vec<Transaction>> {
        let history = self.transaction_repository.list_by_portfolio(portfolio.id())?;
        debug!(
            "Loaded {} transactions for portfolio {} at version {}",
            history.len(),
            portfolio.id(),
            portfolio.version()
        );
        Ok(history)
    }

    /// Appends against the version the history was read at, so a concurrent
    /// writer turns this call into a `ConcurrentModification` error.
    async fn record(&self, portfolio: &Portfolio, transaction: Transaction) -> Result<Transaction> {
        let recorded = self
            .transaction_repository
            .append(transaction, portfolio.version())
            .await?;
        debug!(
            "Recorded {} {} for portfolio {}",
            recorded.transaction_type(),
            recorded.cash_change(),
            portfolio.id()
        );
        Ok(recorded)
    }
}

fn ensure_portfolio_currency(portfolio: &Portfolio, amount: &Money) -> Result<()> {
    if amount.currency() != portfolio.currency() {
        return Err(BusinessRuleError::WrongCurrency {
            portfolio_id: portfolio.id().to_string(),
            expected: portfolio.currency().to_string(),
            found: amount.currency().to_string(),
        }
        .into());
    }
    Ok(())
}

fn log_rejection<T>(operation: &str, portfolio_id: Uuid, result: Result<T>) -> Result<T> {
    if let Err(Error::BusinessRule(e)) = &result {
        warn!("Rejected {} on portfolio {}: {}", operation, portfolio_id, e);
    }
    result
}

#[async_trait::async_trait]
impl TradingServiceTrait for TradingService {
    async fn deposit(&self, portfolio_id: Uuid, amount: Money) -> Result<Transaction> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        ensure_portfolio_currency(&portfolio, &amount)?;
        let transaction =
            Transaction::deposit(Uuid::new_v4(), portfolio.id(), amount, Utc::now())?;
        self.record(&portfolio, transaction).await
    }

    async fn withdraw(&self, portfolio_id: Uuid, amount: Money) -> Result<Transaction> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        ensure_portfolio_currency(&portfolio, &amount)?;
        let history = self.load_history(&portfolio)?;
        log_rejection(
            "withdrawal",
            portfolio_id,
            self.validator
                .ensure_sufficient_funds(&history, portfolio.currency(), &amount),
        )?;
        let transaction =
            Transaction::withdrawal(Uuid::new_v4(), portfolio.id(), amount, Utc::now())?;
        self.record(&portfolio, transaction).await
    }

    async fn buy(
        &self,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price: Money,
    ) -> Result<Transaction> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        ensure_portfolio_currency(&portfolio, &price)?;
        let history = self.load_history(&portfolio)?;
        let cost = trade_value(quantity, &price)?;
        log_rejection(
            "buy",
            portfolio_id,
            self.validator
                .ensure_sufficient_funds(&history, portfolio.currency(), &cost),
        )?;
        let transaction = Transaction::buy(
            Uuid::new_v4(),
            portfolio.id(),
            ticker,
            quantity,
            price,
            Utc::now(),
        )?;
        self.record(&portfolio, transaction).await
    }

    async fn sell(
        &self,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price: Money,
    ) -> Result<Transaction> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        ensure_portfolio_currency(&portfolio, &price)?;
        let history = self.load_history(&portfolio)?;
        log_rejection(
            "sell",
            portfolio_id,
            self.validator
                .ensure_sufficient_shares(&history, &ticker, quantity),
        )?;
        let transaction = Transaction::sell(
            Uuid::new_v4(),
            portfolio.id(),
            ticker,
            quantity,
            price,
            Utc::now(),
        )?;
        self.record(&portfolio, transaction).await
    }

    fn get_cash_balance(&self, portfolio_id: Uuid) -> Result<Money> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        let history = self.load_history(&portfolio)?;
        self.calculator.cash_balance(&history, portfolio.currency())
    }

    fn get_holdings(&self, portfolio_id: Uuid) -> Result<Vec<Holding>> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        let history = self.load_history(&portfolio)?;
        Ok(self.calculator.holdings(&history))
    }

    fn get_holding(&self, portfolio_id: Uuid, ticker: &Ticker) -> Result<Option<Holding>> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        let history = self.load_history(&portfolio)?;
        Ok(self.calculator.holding_for_ticker(&history, ticker))
    }

    fn get_portfolio_value(
        &self,
        portfolio_id: Uuid,
        prices: &PriceMap,
    ) -> Result<PortfolioValuation> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        let history = self.load_history(&portfolio)?;
        self.calculator
            .portfolio_valuation(&history, portfolio.currency(), prices)
    }

    fn get_realized_gains(&self, portfolio_id: Uuid) -> Result<Vec<RealizedGain>> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        let history = self.load_history(&portfolio)?;
        Ok(self.calculator.realized_gains(&history))
    }

    fn get_transactions(&self, portfolio_id: Uuid) -> Result<Vec<Transaction>> {
        let portfolio = self.load_portfolio(portfolio_id)?;
        self.load_history(&portfolio)
    }
}
