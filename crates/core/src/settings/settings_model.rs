use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CURRENCY;
use crate::errors::{Error, Result};
use crate::values::{normalize_currency_code, RoundingPolicy};

/// Ledger-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerSettings {
    /// Cash currency given to portfolios created without one.
    pub default_currency: String,
    /// Policy applied whenever a derived amount is rounded to cents.
    pub rounding_policy: RoundingPolicy,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            rounding_policy: RoundingPolicy::default(),
        }
    }
}

impl LedgerSettings {
    /// Parses settings from JSON. Missing keys take their defaults and the
    /// currency code is normalized.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: LedgerSettings =
            serde_json::from_str(json).map_err(|e| Error::Settings(e.to_string()))?;
        let settings = settings.validate()?;
        debug!(
            "Loaded ledger settings: currency {}, rounding {:?}",
            settings.default_currency, settings.rounding_policy
        );
        Ok(settings)
    }

    /// Checks the settings and returns them in normalized form.
    pub fn validate(self) -> Result<Self> {
        let default_currency = normalize_currency_code(&self.default_currency)
            .map_err(|e| Error::Settings(e.to_string()))?;
        Ok(Self {
            default_currency,
            ..self
        })
    }
}
