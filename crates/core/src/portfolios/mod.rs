//! Portfolios module - identity and metadata of a simulated trading account.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;



pub use portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
