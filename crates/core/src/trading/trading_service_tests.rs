#[cfg(test)]
mod tests {
    use crate::calculator::PriceMap;
    use crate::errors::{BusinessRuleError, CalculatorError, DatabaseError, Error, Result};
    use crate::portfolios::{Portfolio, PortfolioRepositoryTrait};
    use crate::settings::LedgerSettings;
    use crate::trading::{TradingService, TradingServiceTrait};
    use crate::transactions::{sort_chronologically, Transaction, TransactionRepositoryTrait};
    use crate::values::{Money, Quantity, Ticker};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    // ==================== Mock repository ====================

    #[derive(Default)]
    struct MockLedger {
        portfolios: Mutex<HashMap<Uuid, Portfolio>>,
        transactions: Mutex<Vec<Transaction>>,
        /// Bumps the portfolio version between read and append, as a
        /// concurrent writer would.
        interleave_writer: AtomicBool,
    }

    #[async_trait]
    impl PortfolioRepositoryTrait for MockLedger {
        async fn create(&self, portfolio: Portfolio) -> Result<Portfolio> {
            self.portfolios
                .lock()
                .unwrap()
                .insert(portfolio.id(), portfolio.clone());
            Ok(portfolio)
        }

        async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
            self.portfolios
                .lock()
                .unwrap()
                .insert(portfolio.id(), portfolio.clone());
            Ok(portfolio)
        }

        fn get_by_id(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>> {
            Ok(self.portfolios.lock().unwrap().get(&portfolio_id).cloned())
        }

        fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>> {
            Ok(self
                .portfolios
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.user_id() == user_id)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl TransactionRepositoryTrait for MockLedger {
        async fn append(&self, transaction: Transaction, expected_version: u64) -> Result<Transaction> {
            let mut portfolios = self.portfolios.lock().unwrap();
            let portfolio = portfolios
                .get(&transaction.portfolio_id())
                .cloned()
                .ok_or_else(|| DatabaseError::NotFound(transaction.portfolio_id().to_string()))?;
            if portfolio.version() != expected_version {
                return Err(DatabaseError::ConcurrentModification {
                    entity: "portfolio".to_string(),
                    expected: expected_version,
                    actual: portfolio.version(),
                }
                .into());
            }
            portfolios.insert(portfolio.id(), portfolio.next_version());
            self.transactions.lock().unwrap().push(transaction.clone());
            Ok(transaction)
        }

        fn list_by_portfolio(&self, portfolio_id: Uuid) -> Result<Vec<Transaction>> {
            if self.interleave_writer.load(Ordering::SeqCst) {
                let mut portfolios = self.portfolios.lock().unwrap();
                if let Some(portfolio) = portfolios.get(&portfolio_id).cloned() {
                    portfolios.insert(portfolio_id, portfolio.next_version());
                }
            }
            let mut history: Vec<Transaction> = self
                .transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.portfolio_id() == portfolio_id)
                .cloned()
                .collect();
            sort_chronologically(&mut history);
            Ok(history)
        }
    }

    // ==================== Helpers ====================

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    fn aapl() -> Ticker {
        Ticker::new("AAPL").unwrap()
    }

    fn qty(value: Decimal) -> Quantity {
        Quantity::new(value).unwrap()
    }

    async fn setup() -> (Arc<MockLedger>, TradingService, Uuid) {
        let ledger = Arc::new(MockLedger::default());
        let portfolio = Portfolio::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Paper",
            "USD",
            Utc::now() - Duration::days(1),
        )
        .unwrap();
        let portfolio_id = portfolio.id();
        ledger.create(portfolio).await.unwrap();
        let service = TradingService::new(ledger.clone(), ledger.clone(), &LedgerSettings::default());
        (ledger, service, portfolio_id)
    }

    // ==================== Commands ====================

    #[tokio::test]
    async fn test_deposit_buy_sell_flow() {
        let (_, service, id) = setup().await;
        service.deposit(id, usd(dec!(10000))).await.unwrap();
        service
            .buy(id, aapl(), qty(dec!(10)), usd(dec!(150)))
            .await
            .unwrap();
        assert_eq!(service.get_cash_balance(id).unwrap().amount(), dec!(8500));

        let sale = service
            .sell(id, aapl(), qty(dec!(5)), usd(dec!(160)))
            .await
            .unwrap();
        assert_eq!(sale.cash_change().amount(), dec!(800));
        assert_eq!(service.get_cash_balance(id).unwrap().amount(), dec!(9300));

        let holding = service.get_holding(id, &aapl()).unwrap().unwrap();
        assert_eq!(holding.quantity().value(), dec!(5));
        assert_eq!(holding.cost_basis().amount(), dec!(750));
        assert_eq!(service.get_transactions(id).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_withdrawal_over_balance_is_rejected_without_side_effects() {
        let (ledger, service, id) = setup().await;
        service.deposit(id, usd(dec!(100))).await.unwrap();

        let result = service.withdraw(id, usd(dec!(150))).await;
        assert!(matches!(
            result,
            Err(Error::BusinessRule(BusinessRuleError::InsufficientFunds { .. }))
        ));
        assert_eq!(ledger.transactions.lock().unwrap().len(), 1);
        assert_eq!(service.get_cash_balance(id).unwrap().amount(), dec!(100));
    }

    #[tokio::test]
    async fn test_withdrawal_of_entire_balance_is_allowed() {
        let (_, service, id) = setup().await;
        service.deposit(id, usd(dec!(100))).await.unwrap();
        let withdrawal = service.withdraw(id, usd(dec!(100))).await.unwrap();
        assert_eq!(withdrawal.cash_change().amount(), dec!(-100));
        assert!(service.get_cash_balance(id).unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_buy_requires_cash_for_full_cost() {
        let (ledger, service, id) = setup().await;
        service.deposit(id, usd(dec!(1000))).await.unwrap();
        let result = service
            .buy(id, aapl(), qty(dec!(10)), usd(dec!(100.01)))
            .await;
        assert!(matches!(
            result,
            Err(Error::BusinessRule(BusinessRuleError::InsufficientFunds { .. }))
        ));
        assert_eq!(ledger.transactions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sell_requires_held_shares() {
        let (_, service, id) = setup().await;
        service.deposit(id, usd(dec!(1000))).await.unwrap();
        service
            .buy(id, aapl(), qty(dec!(2)), usd(dec!(100)))
            .await
            .unwrap();
        let result = service
            .sell(id, aapl(), qty(dec!(3)), usd(dec!(100)))
            .await;
        assert!(matches!(
            result,
            Err(Error::BusinessRule(BusinessRuleError::InsufficientShares { .. }))
        ));
    }

    #[tokio::test]
    async fn test_amount_in_foreign_currency_is_rejected() {
        let (_, service, id) = setup().await;
        let result = service
            .deposit(id, Money::new(dec!(10), "EUR").unwrap())
            .await;
        assert!(matches!(
            result,
            Err(Error::BusinessRule(BusinessRuleError::WrongCurrency { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_amounts_are_rejected_by_construction() {
        let (_, service, id) = setup().await;
        assert!(matches!(
            service.deposit(id, usd(dec!(0))).await,
            Err(Error::Transaction(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_portfolio_is_not_found() {
        let (_, service, _) = setup().await;
        let result = service.deposit(Uuid::new_v4(), usd(dec!(10))).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
        assert!(service.get_holdings(Uuid::new_v4()).is_err());
    }

    #[tokio::test]
    async fn test_concurrent_write_is_detected() {
        let (ledger, service, id) = setup().await;
        service.deposit(id, usd(dec!(100))).await.unwrap();

        ledger.interleave_writer.store(true, Ordering::SeqCst);
        let result = service.withdraw(id, usd(dec!(50))).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::ConcurrentModification { .. }))
        ));
        assert_eq!(ledger.transactions.lock().unwrap().len(), 1);
    }

    // ==================== Queries ====================

    #[tokio::test]
    async fn test_portfolio_value_needs_prices_for_holdings() {
        let (_, service, id) = setup().await;
        service.deposit(id, usd(dec!(1000))).await.unwrap();
        service
            .buy(id, aapl(), qty(dec!(2)), usd(dec!(100)))
            .await
            .unwrap();

        let result = service.get_portfolio_value(id, &PriceMap::new());
        assert!(matches!(
            result,
            Err(Error::Calculation(CalculatorError::MissingPrice(_)))
        ));

        let mut prices = PriceMap::new();
        prices.insert(aapl(), usd(dec!(110)));
        let valuation = service.get_portfolio_value(id, &prices).unwrap();
        assert_eq!(valuation.cash_balance.amount(), dec!(800));
        assert_eq!(valuation.holdings_value.amount(), dec!(220));
        assert_eq!(valuation.total_value.amount(), dec!(1020));
    }

    #[tokio::test]
    async fn test_realized_gains_query() {
        let (_, service, id) = setup().await;
        service.deposit(id, usd(dec!(1000))).await.unwrap();
        service
            .buy(id, aapl(), qty(dec!(2)), usd(dec!(100)))
            .await
            .unwrap();
        service
            .sell(id, aapl(), qty(dec!(2)), usd(dec!(90)))
            .await
            .unwrap();
        let gains = service.get_realized_gains(id).unwrap();
        assert_eq!(gains[0].realized_gain.amount(), dec!(-20));
        assert!(service.get_holdings(id).unwrap().is_empty());
    }
}
