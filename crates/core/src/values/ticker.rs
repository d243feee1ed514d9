use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::values_errors::ValueError;
use crate::constants::TICKER_MAX_LEN;

/// An exchange ticker symbol, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Result<Self, ValueError> {
        let trimmed = symbol.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= TICKER_MAX_LEN
            && trimmed.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(ValueError::InvalidTicker(symbol.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ticker::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}
