use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::calculator_model::{
    Holding, HoldingValuation, PortfolioHoldingsValue, PortfolioValuation, RealizedGain,
};
use crate::constants::{MONEY_DECIMAL_PLACES, PERCENT_DECIMAL_PLACES};
use crate::errors::{CalculatorError, Error, Result};
use crate::settings::LedgerSettings;
use crate::transactions::{chronological, Transaction, TransactionType};
use crate::values::{Money, Quantity, RoundingPolicy, Ticker, ValueError};

/// Current price per share, keyed by ticker.
pub type PriceMap = HashMap<Ticker, Money>;

/// Running state of one ticker while the ledger is replayed. Amounts stay
/// unrounded until a result is emitted.
#[derive(Debug)]
struct Position {
    currency: String,
    shares: Decimal,
    cost: Decimal,
    proceeds: Decimal,
    cost_sold: Decimal,
    sells: usize,
}

impl Position {
    fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            shares: Decimal::ZERO,
            cost: Decimal::ZERO,
            proceeds: Decimal::ZERO,
            cost_sold: Decimal::ZERO,
            sells: 0,
        }
    }

    /// Adds a lot. Returns `None`, leaving the position untouched, when a
    /// running total leaves the decimal range.
    fn buy(&mut self, shares: Decimal, gross: Decimal) -> Option<()> {
        let total_shares = self.shares.checked_add(shares)?;
        let total_cost = self.cost.checked_add(gross)?;
        self.shares = total_shares;
        self.cost = total_cost;
        Some(())
    }

    /// Removes shares and the proportional share of cost. Returns `None`,
    /// leaving the position untouched, when the result is out of range.
    fn sell(&mut self, shares: Decimal, gross: Decimal) -> Option<()> {
        let remaining_shares = self.shares.checked_sub(shares)?;
        let remaining_cost = if self.shares.is_zero() {
            Decimal::ZERO
        } else {
            // Large positions overflow `cost * remaining`; the ratio keeps them in range.
            self.cost
                .checked_mul(remaining_shares)
                .and_then(|product| product.checked_div(self.shares))
                .or_else(|| {
                    remaining_shares
                        .checked_div(self.shares)
                        .and_then(|ratio| self.cost.checked_mul(ratio))
                })?
        };
        let cost_sold = self
            .cost_sold
            .checked_add(self.cost.checked_sub(remaining_cost)?)?;
        let proceeds = self.proceeds.checked_add(gross)?;

        self.shares = remaining_shares;
        self.cost = remaining_cost;
        self.cost_sold = cost_sold;
        self.proceeds = proceeds;
        self.sells += 1;
        Some(())
    }
}

/// Maps a currency clash between ledger amounts to a calculation error.
fn ledger_error(err: ValueError) -> Error {
    match err {
        ValueError::CurrencyMismatch { left, right } => CalculatorError::CurrencyMismatch {
            expected: left,
            found: right,
        }
        .into(),
        other => other.into(),
    }
}

fn accumulate(total: &Money, amount: &Money) -> Result<Money> {
    total.add(amount).map_err(ledger_error)
}

/// Derives ledger state with a fixed rounding policy.
///
/// Every method is a pure function of its arguments. The free functions in
/// this module are shorthands for the default (half-even) calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCalculator {
    rounding: RoundingPolicy,
}

impl LedgerCalculator {
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    pub fn from_settings(settings: &LedgerSettings) -> Self {
        Self::new(settings.rounding_policy)
    }

    pub fn rounding_policy(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Sums every cash change, starting from zero in `currency`.
    ///
    /// An overdrawn history is summed as-is. The only failure is an entry in a
    /// different currency.
    pub fn cash_balance(&self, transactions: &[Transaction], currency: &str) -> Result<Money> {
        debug!(
            "Calculating cash balance in {} over {} transactions",
            currency,
            transactions.len()
        );
        let zero = Money::zero(currency)?;
        chronological(transactions)
            .into_iter()
            .try_fold(zero, |balance, transaction| {
                accumulate(&balance, transaction.cash_change())
            })
    }

    /// Current holdings, sorted by ticker. Tickers with no shares left are
    /// omitted.
    pub fn holdings(&self, transactions: &[Transaction]) -> Vec<Holding> {
        debug!(
            "Calculating holdings over {} transactions",
            transactions.len()
        );
        replay(transactions)
            .into_iter()
            .filter(|(_, position)| position.shares > Decimal::ZERO)
            .filter_map(|(ticker, position)| self.emit_holding(ticker, &position))
            .collect()
    }

    pub fn holding_for_ticker(
        &self,
        transactions: &[Transaction],
        ticker: &Ticker,
    ) -> Option<Holding> {
        self.holdings(transactions)
            .into_iter()
            .find(|holding| holding.ticker() == ticker)
    }

    /// Marks `holdings` to `prices`. Every held ticker needs a price in the
    /// holding's currency.
    pub fn portfolio_value(
        &self,
        holdings: &[Holding],
        prices: &PriceMap,
        currency: &str,
    ) -> Result<PortfolioHoldingsValue> {
        debug!(
            "Valuing {} holdings against {} prices",
            holdings.len(),
            prices.len()
        );
        let mut total_market_value = Money::zero(currency)?;
        let mut total_cost_basis = Money::zero(currency)?;
        let mut valuations = Vec::with_capacity(holdings.len());

        for holding in holdings {
            let price = prices
                .get(holding.ticker())
                .ok_or_else(|| CalculatorError::MissingPrice(holding.ticker().to_string()))?;
            let valuation = self.value_holding(holding, price)?;
            total_market_value = accumulate(&total_market_value, &valuation.market_value)?;
            total_cost_basis = accumulate(&total_cost_basis, holding.cost_basis())?;
            valuations.push(valuation);
        }

        let total_unrealized_gain = total_market_value
            .subtract(&total_cost_basis)
            .map_err(ledger_error)?;
        Ok(PortfolioHoldingsValue {
            holdings: valuations,
            total_market_value,
            total_cost_basis,
            total_unrealized_gain,
        })
    }

    /// Cash plus holdings value. Both must be in the same currency.
    pub fn total_value(&self, cash: &Money, holdings_value: &Money) -> Result<Money> {
        accumulate(cash, holdings_value)
    }

    /// Cash balance and marked holdings combined into one valuation.
    pub fn portfolio_valuation(
        &self,
        transactions: &[Transaction],
        currency: &str,
        prices: &PriceMap,
    ) -> Result<PortfolioValuation> {
        let cash_balance = self.cash_balance(transactions, currency)?;
        let holdings = self.holdings(transactions);
        let value = self.portfolio_value(&holdings, prices, currency)?;
        let total_value = self.total_value(&cash_balance, &value.total_market_value)?;
        Ok(PortfolioValuation {
            holdings: value.holdings,
            holdings_value: value.total_market_value,
            cash_balance,
            total_value,
            total_cost_basis: value.total_cost_basis,
            total_unrealized_gain: value.total_unrealized_gain,
        })
    }

    /// Realized gain per ticker that has at least one sell, sorted by ticker.
    /// Each sell realizes its proceeds minus the share of cost basis it
    /// removed.
    pub fn realized_gains(&self, transactions: &[Transaction]) -> Vec<RealizedGain> {
        debug!(
            "Calculating realized gains over {} transactions",
            transactions.len()
        );
        replay(transactions)
            .into_iter()
            .filter(|(_, position)| position.sells > 0)
            .filter_map(|(ticker, position)| {
                let rounded = |amount| {
                    Money::new_rounded(amount, &position.currency, self.rounding)
                };
                let result = rounded(position.proceeds).and_then(|proceeds| {
                    let cost_basis_sold = rounded(position.cost_sold)?;
                    let realized_gain = proceeds.subtract(&cost_basis_sold)?;
                    Ok(RealizedGain {
                        ticker: ticker.clone(),
                        proceeds,
                        cost_basis_sold,
                        realized_gain,
                    })
                });
                match result {
                    Ok(gain) => Some(gain),
                    Err(e) => {
                        error!("Failed to emit realized gain for {}: {}", ticker, e);
                        None
                    }
                }
            })
            .collect()
    }

    fn emit_holding(&self, ticker: Ticker, position: &Position) -> Option<Holding> {
        let mut cost = self.rounding.round(position.cost, MONEY_DECIMAL_PLACES);
        if cost < Decimal::ZERO {
            warn!(
                "Cost basis of {} replayed to {} after oversold sells; reporting zero",
                ticker, cost
            );
            cost = Decimal::ZERO;
        }
        let holding = Quantity::new(position.shares)
            .and_then(|quantity| {
                Money::new(cost, &position.currency).map(|cost_basis| (quantity, cost_basis))
            })
            .map_err(Error::from)
            .and_then(|(quantity, cost_basis)| Holding::new(ticker.clone(), quantity, cost_basis));
        match holding {
            Ok(holding) => Some(holding),
            Err(e) => {
                error!("Failed to emit holding for {}: {}", ticker, e);
                None
            }
        }
    }

    fn value_holding(&self, holding: &Holding, price: &Money) -> Result<HoldingValuation> {
        let cost_basis = holding.cost_basis();
        if !price.same_currency(cost_basis) {
            return Err(CalculatorError::CurrencyMismatch {
                expected: cost_basis.currency().to_string(),
                found: price.currency().to_string(),
            }
            .into());
        }
        let market_value = price.multiply_with(holding.quantity().value(), self.rounding)?;
        let unrealized_gain = market_value.subtract(cost_basis)?;
        let unrealized_gain_percent = if cost_basis.is_zero() {
            None
        } else {
            unrealized_gain
                .amount()
                .checked_div(cost_basis.amount())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|percent| self.rounding.round(percent, PERCENT_DECIMAL_PLACES))
        };
        Ok(HoldingValuation {
            holding: holding.clone(),
            current_price: price.clone(),
            market_value,
            unrealized_gain,
            unrealized_gain_percent,
        })
    }
}

/// Replays every trade in chronological order into per-ticker positions.
///
/// A sell keeps the fraction `(shares - sold) / shares` of the running cost,
/// so average cost is unchanged by partial sells. Selling from zero shares
/// keeps nothing. Oversold sells are logged and applied as-is; trades whose
/// totals would overflow are logged and skipped.
fn replay(transactions: &[Transaction]) -> BTreeMap<Ticker, Position> {
    let mut positions: BTreeMap<Ticker, Position> = BTreeMap::new();

    for transaction in chronological(transactions) {
        let (Some(ticker), Some(quantity)) = (transaction.ticker(), transaction.quantity()) else {
            continue;
        };
        let shares_traded = quantity.value();
        // Cash change is exactly -(q * p) for a buy and +(q * p) for a sell.
        let gross = transaction.cash_change().amount().abs();
        let currency = transaction.cash_change().currency();

        let position = positions
            .entry(ticker.clone())
            .or_insert_with(|| Position::new(currency));
        if position.currency != currency {
            warn!(
                "Skipping transaction {}: {} trades in {} but this entry is in {}",
                transaction.id(),
                ticker,
                position.currency,
                currency
            );
            continue;
        }

        let applied = match transaction.transaction_type() {
            TransactionType::Buy => position.buy(shares_traded, gross),
            TransactionType::Sell => {
                if shares_traded > position.shares {
                    warn!(
                        "Transaction {} sells {} {} while only {} are held",
                        transaction.id(),
                        shares_traded,
                        ticker,
                        position.shares
                    );
                }
                position.sell(shares_traded, gross)
            }
            TransactionType::Deposit | TransactionType::Withdrawal => Some(()),
        };
        if applied.is_none() {
            warn!(
                "Skipping transaction {}: {} position totals would leave the decimal range",
                transaction.id(),
                ticker
            );
        }
    }

    positions
}

pub fn calculate_cash_balance(transactions: &[Transaction], currency: &str) -> Result<Money> {
    LedgerCalculator::default().cash_balance(transactions, currency)
}

pub fn calculate_holdings(transactions: &[Transaction]) -> Vec<Holding> {
    LedgerCalculator::default().holdings(transactions)
}

pub fn calculate_holding_for_ticker(
    transactions: &[Transaction],
    ticker: &Ticker,
) -> Option<Holding> {
    LedgerCalculator::default().holding_for_ticker(transactions, ticker)
}

pub fn calculate_portfolio_value(
    holdings: &[Holding],
    prices: &PriceMap,
    currency: &str,
) -> Result<PortfolioHoldingsValue> {
    LedgerCalculator::default().portfolio_value(holdings, prices, currency)
}

pub fn calculate_total_value(cash: &Money, holdings_value: &Money) -> Result<Money> {
    LedgerCalculator::default().total_value(cash, holdings_value)
}

pub fn calculate_portfolio_valuation(
    transactions: &[Transaction],
    currency: &str,
    prices: &PriceMap,
) -> Result<PortfolioValuation> {
    LedgerCalculator::default().portfolio_valuation(transactions, currency, prices)
}

pub fn calculate_realized_gains(transactions: &[Transaction]) -> Vec<RealizedGain> {
    LedgerCalculator::default().realized_gains(transactions)
}
