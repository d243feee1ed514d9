use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use papertrade_core::errors::{DatabaseError, Result};
use papertrade_core::portfolios::{Portfolio, PortfolioRepositoryTrait};

use crate::store::InMemoryStore;

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryStore {
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let mut state = self.write()?;
        if state.portfolios.contains_key(&portfolio.id()) {
            return Err(DatabaseError::UniqueViolation(format!(
                "Portfolio {} already exists",
                portfolio.id()
            ))
            .into());
        }
        debug!(
            "Creating portfolio {} for user {}",
            portfolio.id(),
            portfolio.user_id()
        );
        state.ledgers.entry(portfolio.id()).or_default();
        state.portfolios.insert(portfolio.id(), portfolio.clone());
        Ok(portfolio)
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio> {
        let mut state = self.write()?;
        let stored = state.portfolios.get(&portfolio.id()).ok_or_else(|| {
            DatabaseError::NotFound(format!("Portfolio {} not found", portfolio.id()))
        })?;
        // Only the name is taken from the caller; version stays the stored one.
        let renamed = stored.rename(portfolio.name())?;
        state.portfolios.insert(renamed.id(), renamed.clone());
        Ok(renamed)
    }

    fn get_by_id(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>> {
        Ok(self.read()?.portfolios.get(&portfolio_id).cloned())
    }

    fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>> {
        let state = self.read()?;
        let mut portfolios: Vec<Portfolio> = state
            .portfolios
            .values()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect();
        portfolios.sort_by_key(|p| (p.created_at(), p.id()));
        Ok(portfolios)
    }
}
