/// Transaction types
///
/// Each constant is the canonical wire name of one ledger entry kind.

/// Cash paid into the portfolio. Increases cash.
pub const TRANSACTION_TYPE_DEPOSIT: &str = "DEPOSIT";

/// Cash taken out of the portfolio. Decreases cash.
pub const TRANSACTION_TYPE_WITHDRAWAL: &str = "WITHDRAWAL";

/// Purchase of shares. Decreases cash by quantity * price and increases quantity.
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Sale of shares. Increases cash by quantity * price and decreases quantity.
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Transaction types that carry a ticker, quantity and price
pub const TRADE_TRANSACTION_TYPES: [&str; 2] = [TRANSACTION_TYPE_BUY, TRANSACTION_TYPE_SELL];

/// Transaction types that only move cash
pub const CASH_TRANSACTION_TYPES: [&str; 2] =
    [TRANSACTION_TYPE_DEPOSIT, TRANSACTION_TYPE_WITHDRAWAL];

/// Checks if a transaction type is a trade (BUY or SELL).
pub fn is_trade_type(transaction_type: &str) -> bool {
    TRADE_TRANSACTION_TYPES.contains(&transaction_type)
}
