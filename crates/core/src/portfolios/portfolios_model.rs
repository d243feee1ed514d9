//! Portfolio domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::PORTFOLIO_NAME_MAX_LEN;
use crate::errors::{Error, Result, ValidationError};
use crate::values::normalize_currency_code;

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Portfolio name cannot be empty".to_string(),
        )));
    }
    if trimmed.chars().count() > PORTFOLIO_NAME_MAX_LEN {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Portfolio name cannot exceed {} characters",
            PORTFOLIO_NAME_MAX_LEN
        ))));
    }
    Ok(trimmed.to_string())
}

/// Domain model representing a portfolio.
///
/// Everything except the name is fixed at creation. `version` is the
/// optimistic-concurrency counter owned by the persistence layer; it moves
/// forward once per appended transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PortfolioRecord")]
pub struct Portfolio {
    id: Uuid,
    user_id: Uuid,
    name: String,
    currency: String,
    created_at: DateTime<Utc>,
    version: u64,
}

/// Unvalidated wire shape of a stored portfolio.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    currency: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

impl TryFrom<PortfolioRecord> for Portfolio {
    type Error = Error;

    fn try_from(record: PortfolioRecord) -> Result<Self> {
        let mut portfolio = Portfolio::new(
            record.id,
            record.user_id,
            &record.name,
            &record.currency,
            record.created_at,
        )?;
        portfolio.version = record.version;
        Ok(portfolio)
    }
}

impl PartialEq for Portfolio {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Portfolio {}

impl Portfolio {
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        name: &str,
        currency: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = validate_name(name)?;
        let currency = normalize_currency_code(currency)?;
        if created_at > Utc::now() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Portfolio creation time {} is in the future",
                created_at
            ))));
        }
        Ok(Self {
            id,
            user_id,
            name,
            currency,
            created_at,
            version: 0,
        })
    }

    /// Returns a copy carrying `name`. Nothing else changes.
    pub fn rename(&self, name: &str) -> Result<Self> {
        Ok(Self {
            name: validate_name(name)?,
            ..self.clone()
        })
    }

    /// Returns a copy with the version advanced by one. Intended for
    /// repository implementations recording an append.
    pub fn next_version(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Input model for creating a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub name: String,
    /// Falls back to the configured default currency when absent.
    pub currency: Option<String>,
}

impl NewPortfolio {
    /// Validates the new portfolio data.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(currency) = &self.currency {
            normalize_currency_code(currency)?;
        }
        Ok(())
    }
}

/// Input model for renaming an existing portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: Uuid,
    pub name: String,
}

impl PortfolioUpdate {
    /// Validates the portfolio update data.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        Ok(())
    }
}
