//! Value types - self-validating money, quantity and ticker wrappers.
//!
//! Construction is the only validation point. Every operation returns a new
//! instance, so an invalid amount, quantity or symbol can never exist.

mod money;
mod quantity;
mod rounding;
mod ticker;
mod values_errors;


pub use money::{normalize_currency_code, Money};
pub use quantity::Quantity;
pub use rounding::RoundingPolicy;
pub use ticker::Ticker;
pub use values_errors::ValueError;
