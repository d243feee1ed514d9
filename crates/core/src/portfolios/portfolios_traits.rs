//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! storage-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use uuid::Uuid;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use crate::errors::Result;

/// Trait defining the contract for Portfolio repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Stores a new portfolio. Fails with `DatabaseError::UniqueViolation`
    /// if the id is taken.
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio>;

    /// Replaces the stored name of an existing portfolio. The stored version
    /// is kept; only ledger appends move it.
    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio>;

    /// Retrieves a portfolio by its ID, `None` when absent.
    fn get_by_id(&self, portfolio_id: Uuid) -> Result<Option<Portfolio>>;

    /// Lists the portfolios owned by a user, oldest first.
    fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Creates a new portfolio with input validation.
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Renames an existing portfolio.
    async fn rename_portfolio(&self, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Retrieves a portfolio, failing with `DatabaseError::NotFound` when absent.
    fn get_portfolio(&self, portfolio_id: Uuid) -> Result<Portfolio>;

    /// Lists a user's portfolios.
    fn list_portfolios_for_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>>;
}
