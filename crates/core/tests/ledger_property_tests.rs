//! Property-based integration tests for the ledger calculator.
//!
//! These tests verify that universal properties hold across generated
//! histories, using the `proptest` crate for random test case generation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use papertrade_core::calculator::{
    calculate_cash_balance, calculate_holding_for_ticker, calculate_holdings,
};
use papertrade_core::transactions::Transaction;
use papertrade_core::validation::TradeValidator;
use papertrade_core::{Money, Quantity, Ticker};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

const SYMBOLS: [&str; 3] = ["AAPL", "MSFT", "NVDA"];

// =============================================================================
// Generators
// =============================================================================

/// A requested ledger operation. Amounts are in cents, quantities in whole
/// shares.
#[derive(Debug, Clone)]
enum Op {
    Deposit(i64),
    Withdraw(i64),
    Buy(usize, i64, i64),
    Sell(usize, i64, i64),
}

fn arb_cents() -> impl Strategy<Value = i64> {
    1i64..5_000_000
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_cents().prop_map(Op::Deposit),
        arb_cents().prop_map(Op::Withdraw),
        (0..SYMBOLS.len(), 1i64..200, 1i64..100_000).prop_map(|(s, q, p)| Op::Buy(s, q, p)),
        (0..SYMBOLS.len(), 1i64..200, 1i64..100_000).prop_map(|(s, q, p)| Op::Sell(s, q, p)),
    ]
}

fn arb_ops(max_count: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(arb_op(), 0..=max_count)
}

// =============================================================================
// Helpers
// =============================================================================

fn cents(value: i64) -> Money {
    Money::new(Decimal::new(value, 2), "USD").unwrap()
}

fn shares(value: i64) -> Quantity {
    Quantity::new(Decimal::from(value)).unwrap()
}

fn ticker(index: usize) -> Ticker {
    Ticker::new(SYMBOLS[index]).unwrap()
}

fn at(step: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(step as i64)
}

/// Builds the transaction for `op` without any business-rule checks.
fn build(op: &Op, step: usize) -> Transaction {
    let (id, portfolio_id) = (Uuid::new_v4(), Uuid::nil());
    match *op {
        Op::Deposit(amount) => Transaction::deposit(id, portfolio_id, cents(amount), at(step)),
        Op::Withdraw(amount) => {
            Transaction::withdrawal(id, portfolio_id, cents(amount), at(step))
        }
        Op::Buy(s, q, p) => {
            Transaction::buy(id, portfolio_id, ticker(s), shares(q), cents(p), at(step))
        }
        Op::Sell(s, q, p) => {
            Transaction::sell(id, portfolio_id, ticker(s), shares(q), cents(p), at(step))
        }
    }
    .unwrap()
}

/// Replays `ops` the way the trading service does, dropping every operation
/// the validator rejects.
fn valid_history(ops: &[Op]) -> Vec<Transaction> {
    let validator = TradeValidator::default();
    let mut history = Vec::new();
    for (step, op) in ops.iter().enumerate() {
        let allowed = match *op {
            Op::Deposit(_) => true,
            Op::Withdraw(amount) => validator
                .ensure_sufficient_funds(&history, "USD", &cents(amount))
                .is_ok(),
            Op::Buy(_, q, p) => validator
                .ensure_sufficient_funds(&history, "USD", &cents(q * p))
                .is_ok(),
            Op::Sell(s, q, _) => validator
                .ensure_sufficient_shares(&history, &ticker(s), shares(q))
                .is_ok(),
        };
        if allowed {
            history.push(build(op, step));
        }
    }
    history
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Feature: ledger, Property 1: Balance invariant**
    ///
    /// The cash balance equals deposits minus withdrawals minus buy costs plus
    /// sell proceeds, for any history, valid or not.
    #[test]
    fn prop_balance_matches_cash_flow_categories(ops in arb_ops(40)) {
        let history: Vec<Transaction> =
            ops.iter().enumerate().map(|(step, op)| build(op, step)).collect();

        let mut expected = 0i64;
        for op in &ops {
            expected += match *op {
                Op::Deposit(amount) => amount,
                Op::Withdraw(amount) => -amount,
                Op::Buy(_, q, p) => -(q * p),
                Op::Sell(_, q, p) => q * p,
            };
        }

        let balance = calculate_cash_balance(&history, "USD").unwrap();
        prop_assert_eq!(balance.amount(), Decimal::new(expected, 2));
    }

    /// **Feature: ledger, Property 2: Non-negativity under valid histories**
    ///
    /// When every operation passed validation, cash never goes negative and
    /// every reported holding has positive shares and non-negative cost.
    #[test]
    fn prop_valid_histories_stay_non_negative(ops in arb_ops(40)) {
        let history = valid_history(&ops);

        let balance = calculate_cash_balance(&history, "USD").unwrap();
        prop_assert!(!balance.is_negative());

        for holding in calculate_holdings(&history) {
            prop_assert!(!holding.quantity().is_zero());
            prop_assert!(!holding.cost_basis().is_negative());
        }
    }

    /// **Feature: ledger, Property 3: Cost basis proportionality**
    ///
    /// Selling part of a single-lot position keeps the average cost at the
    /// purchase price.
    #[test]
    fn prop_partial_sell_keeps_average_cost(
        bought in 2i64..500,
        sold_fraction in 1i64..100,
        price in 1i64..100_000,
        sale_price in 1i64..100_000,
    ) {
        let sold = (bought * sold_fraction / 100).clamp(1, bought - 1);
        let history = vec![
            build(&Op::Buy(0, bought, price), 0),
            build(&Op::Sell(0, sold, sale_price), 1),
        ];

        let holding = calculate_holding_for_ticker(&history, &ticker(0)).unwrap();
        prop_assert_eq!(holding.quantity().value(), Decimal::from(bought - sold));
        prop_assert_eq!(holding.cost_basis().amount(), Decimal::new((bought - sold) * price, 2));
        prop_assert_eq!(holding.average_cost().unwrap().amount(), Decimal::new(price, 2));
    }

    /// **Feature: ledger, Property 4: Full close idempotence**
    ///
    /// Selling everything removes the holding no matter how many lots built it.
    #[test]
    fn prop_full_close_removes_holding(
        lots in proptest::collection::vec((1i64..100, 1i64..100_000), 1..6),
        sale_price in 1i64..100_000,
    ) {
        let mut history: Vec<Transaction> = lots
            .iter()
            .enumerate()
            .map(|(step, (q, p))| build(&Op::Buy(1, *q, *p), step))
            .collect();
        let total: i64 = lots.iter().map(|(q, _)| q).sum();
        history.push(build(&Op::Sell(1, total, sale_price), lots.len()));

        prop_assert!(calculate_holding_for_ticker(&history, &ticker(1)).is_none());
        prop_assert!(calculate_holdings(&history).is_empty());
    }

    /// **Feature: ledger, Property 5: Buy cash change**
    ///
    /// A buy always books exactly the negated gross value.
    #[test]
    fn prop_buy_books_negated_gross(q in 1i64..10_000, p in 1i64..1_000_000) {
        let buy = build(&Op::Buy(2, q, p), 0);
        prop_assert_eq!(buy.cash_change().amount(), Decimal::new(-(q * p), 2));
    }

    /// **Feature: ledger, Property 6: Replay order follows timestamps**
    ///
    /// Holdings depend on timestamps only, not on the order of the input slice.
    #[test]
    fn prop_holdings_ignore_input_order(ops in arb_ops(30)) {
        let history = valid_history(&ops);
        let mut reversed = history.clone();
        reversed.reverse();

        let forward: Vec<(String, Decimal, Decimal)> = calculate_holdings(&history)
            .iter()
            .map(|h| (h.ticker().to_string(), h.quantity().value(), h.cost_basis().amount()))
            .collect();
        let backward: Vec<(String, Decimal, Decimal)> = calculate_holdings(&reversed)
            .iter()
            .map(|h| (h.ticker().to_string(), h.quantity().value(), h.cost_basis().amount()))
            .collect();
        prop_assert_eq!(forward, backward);
    }
}
