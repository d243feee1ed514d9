/// Fractional digits allowed on a monetary amount
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Fractional digits allowed on a share quantity
pub const QUANTITY_DECIMAL_PLACES: u32 = 4;

/// Longest accepted ticker symbol
pub const TICKER_MAX_LEN: usize = 5;

/// Longest accepted portfolio name, in characters
pub const PORTFOLIO_NAME_MAX_LEN: usize = 100;

/// Longest accepted free-text note on a transaction, in characters
pub const TRANSACTION_NOTES_MAX_LEN: usize = 500;

/// Currency used when neither the caller nor the settings specify one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Decimal precision for gain percentages
pub const PERCENT_DECIMAL_PLACES: u32 = 4;
