use chrono::Utc;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::settings::LedgerSettings;

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    settings: LedgerSettings,
}

impl PortfolioService {
    pub fn new(repository: Arc<dyn PortfolioRepositoryTrait>, settings: LedgerSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        let currency = new_portfolio
            .currency
            .as_deref()
            .unwrap_or(&self.settings.default_currency);
        debug!(
            "Creating portfolio '{}' for user {} in {}",
            new_portfolio.name, new_portfolio.user_id, currency
        );

        let portfolio = Portfolio::new(
            new_portfolio.id.unwrap_or_else(Uuid::new_v4),
            new_portfolio.user_id,
            &new_portfolio.name,
            currency,
            Utc::now(),
        )?;
        self.repository.create(portfolio).await
    }

    async fn rename_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        update.validate()?;
        let renamed = self.get_portfolio(update.id)?.rename(&update.name)?;
        self.repository.update(renamed).await
    }

    fn get_portfolio(&self, portfolio_id: Uuid) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!(
                "Portfolio {} not found",
                portfolio_id
            )))
        })
    }

    fn list_portfolios_for_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>> {
        self.repository.list_by_user(user_id)
    }
}
