//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::transactions_constants::*;
use super::transactions_errors::TransactionError;
use crate::constants::TRANSACTION_NOTES_MAX_LEN;
use crate::errors::{Error, Result};
use crate::values::{Money, Quantity, Ticker};

/// The four kinds of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => TRANSACTION_TYPE_DEPOSIT,
            TransactionType::Withdrawal => TRANSACTION_TYPE_WITHDRAWAL,
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
        }
    }

    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionType::Buy | TransactionType::Sell)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == TRANSACTION_TYPE_DEPOSIT => Ok(TransactionType::Deposit),
            s if s == TRANSACTION_TYPE_WITHDRAWAL => Ok(TransactionType::Withdrawal),
            s if s == TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            s if s == TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            _ => Err(TransactionError::UnknownType(s.to_string())),
        }
    }
}

/// Input model for a ledger entry. Also the wire shape a stored ledger is
/// read back from, so every persisted entry is re-validated on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub transaction_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub cash_change: Money,
    #[serde(default)]
    pub ticker: Option<Ticker>,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    pub price_per_share: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An immutable, validated ledger entry.
///
/// Fields are private and there are no setters: a mistake is corrected by
/// appending a compensating transaction, never by editing this one.
/// Two transactions are equal when their ids are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NewTransaction")]
pub struct Transaction {
    id: Uuid,
    portfolio_id: Uuid,
    transaction_type: TransactionType,
    timestamp: DateTime<Utc>,
    cash_change: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticker: Option<Ticker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price_per_share: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl TryFrom<NewTransaction> for Transaction {
    type Error = Error;

    fn try_from(new: NewTransaction) -> Result<Self> {
        Transaction::new(new)
    }
}

impl Transaction {
    /// Validates every invariant of `new` and builds the entry, or fails
    /// without building anything.
    pub fn new(new: NewTransaction) -> Result<Self> {
        Self::new_as_of(new, Utc::now())
    }

    /// Same as [`Transaction::new`] with an explicit notion of "now" for the
    /// future-timestamp check.
    pub fn new_as_of(new: NewTransaction, now: DateTime<Utc>) -> Result<Self> {
        validate(&new, now)?;
        Ok(Self {
            id: new.id,
            portfolio_id: new.portfolio_id,
            transaction_type: new.transaction_type,
            timestamp: new.timestamp,
            cash_change: new.cash_change,
            ticker: new.ticker,
            quantity: new.quantity,
            price_per_share: new.price_per_share,
            notes: new.notes,
        })
    }

    /// A deposit of `amount` (which must be positive).
    pub fn deposit(
        id: Uuid,
        portfolio_id: Uuid,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(cash_entry(id, portfolio_id, TransactionType::Deposit, amount, timestamp))
    }

    /// A withdrawal of `amount`. The amount is given as a positive figure and
    /// stored as a negative cash change.
    pub fn withdrawal(
        id: Uuid,
        portfolio_id: Uuid,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(cash_entry(
            id,
            portfolio_id,
            TransactionType::Withdrawal,
            amount.negate(),
            timestamp,
        ))
    }

    /// A purchase whose cash change is exactly `-(quantity * price)`.
    pub fn buy(
        id: Uuid,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price_per_share: Money,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let gross = trade_value(quantity, &price_per_share)?;
        Self::new(trade_entry(
            id,
            portfolio_id,
            TransactionType::Buy,
            gross.negate(),
            ticker,
            quantity,
            price_per_share,
            timestamp,
        ))
    }

    /// A sale whose cash change is exactly `+(quantity * price)`.
    pub fn sell(
        id: Uuid,
        portfolio_id: Uuid,
        ticker: Ticker,
        quantity: Quantity,
        price_per_share: Money,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let gross = trade_value(quantity, &price_per_share)?;
        Self::new(trade_entry(
            id,
            portfolio_id,
            TransactionType::Sell,
            gross,
            ticker,
            quantity,
            price_per_share,
            timestamp,
        ))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn portfolio_id(&self) -> Uuid {
        self.portfolio_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn cash_change(&self) -> &Money {
        &self.cash_change
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn quantity(&self) -> Option<Quantity> {
        self.quantity
    }

    pub fn price_per_share(&self) -> Option<&Money> {
        self.price_per_share.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_trade(&self) -> bool {
        self.transaction_type.is_trade()
    }
}

/// Sorts in place by timestamp ascending. The sort is stable, so entries
/// with equal timestamps keep their insertion order.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| t.timestamp);
}

/// Borrowed view of `transactions` in chronological order, ties kept in
/// input order. The input slice is left untouched.
pub fn chronological(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.timestamp);
    ordered
}

fn cash_entry(
    id: Uuid,
    portfolio_id: Uuid,
    transaction_type: TransactionType,
    cash_change: Money,
    timestamp: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        id,
        portfolio_id,
        transaction_type,
        timestamp,
        cash_change,
        ticker: None,
        quantity: None,
        price_per_share: None,
        notes: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn trade_entry(
    id: Uuid,
    portfolio_id: Uuid,
    transaction_type: TransactionType,
    cash_change: Money,
    ticker: Ticker,
    quantity: Quantity,
    price_per_share: Money,
    timestamp: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        id,
        portfolio_id,
        transaction_type,
        timestamp,
        cash_change,
        ticker: Some(ticker),
        quantity: Some(quantity),
        price_per_share: Some(price_per_share),
        notes: None,
    }
}

/// Exact gross value `quantity * price` of a trade. Fails instead of rounding
/// when the product has more than two fractional digits.
pub fn trade_value(quantity: Quantity, price: &Money) -> Result<Money> {
    let gross = quantity
        .value()
        .checked_mul(price.amount())
        .ok_or_else(|| {
            crate::values::ValueError::OutOfRange(format!("{} * {}", quantity, price))
        })?;
    Ok(Money::new(gross, price.currency())?)
}

fn validate(new: &NewTransaction, now: DateTime<Utc>) -> std::result::Result<(), TransactionError> {
    let kind = new.transaction_type;

    if new.timestamp > now {
        return Err(TransactionError::FutureTimestamp(new.timestamp));
    }

    if let Some(notes) = &new.notes {
        if notes.chars().count() > TRANSACTION_NOTES_MAX_LEN {
            return Err(TransactionError::NotesTooLong {
                max: TRANSACTION_NOTES_MAX_LEN,
            });
        }
    }

    match kind {
        TransactionType::Deposit | TransactionType::Withdrawal => {
            reject_trade_fields(new)?;
            let (ok, expected) = if kind == TransactionType::Deposit {
                (new.cash_change.is_positive(), "positive")
            } else {
                (new.cash_change.is_negative(), "negative")
            };
            if !ok {
                return Err(TransactionError::InvalidCashChange {
                    transaction_type: kind.to_string(),
                    expected,
                    actual: new.cash_change.amount(),
                });
            }
        }
        TransactionType::Buy | TransactionType::Sell => {
            let missing = |field| TransactionError::MissingTradeField {
                transaction_type: kind.to_string(),
                field,
            };
            new.ticker.as_ref().ok_or_else(|| missing("ticker"))?;
            let quantity = new.quantity.ok_or_else(|| missing("quantity"))?;
            let price = new
                .price_per_share
                .as_ref()
                .ok_or_else(|| missing("price_per_share"))?;

            if quantity.is_zero() {
                return Err(TransactionError::NonPositiveQuantity);
            }
            if !price.is_positive() {
                return Err(TransactionError::NonPositivePrice(price.amount()));
            }
            if !price.same_currency(&new.cash_change) {
                return Err(TransactionError::CurrencyMismatch {
                    cash_currency: new.cash_change.currency().to_string(),
                    price_currency: price.currency().to_string(),
                });
            }

            let (sign_ok, expected_sign) = if kind == TransactionType::Buy {
                (new.cash_change.is_negative(), "negative")
            } else {
                (new.cash_change.is_positive(), "positive")
            };
            if !sign_ok {
                return Err(TransactionError::InvalidCashChange {
                    transaction_type: kind.to_string(),
                    expected: expected_sign,
                    actual: new.cash_change.amount(),
                });
            }

            let gross = quantity
                .value()
                .checked_mul(price.amount())
                .ok_or(TransactionError::TradeValueOverflow {
                    quantity: quantity.value(),
                    price: price.amount(),
                })?;
            let expected = if kind == TransactionType::Buy {
                -gross
            } else {
                gross
            };
            if new.cash_change.amount() != expected {
                return Err(TransactionError::CashChangeMismatch {
                    expected,
                    actual: new.cash_change.amount(),
                });
            }
        }
    }

    Ok(())
}

fn reject_trade_fields(new: &NewTransaction) -> std::result::Result<(), TransactionError> {
    let unexpected = |field| TransactionError::UnexpectedTradeField {
        transaction_type: new.transaction_type.to_string(),
        field,
    };
    if new.ticker.is_some() {
        return Err(unexpected("ticker"));
    }
    if new.quantity.is_some() {
        return Err(unexpected("quantity"));
    }
    if new.price_per_share.is_some() {
        return Err(unexpected("price_per_share"));
    }
    Ok(())
}
