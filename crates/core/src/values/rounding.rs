use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How a derived amount is brought back to the precision of its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingPolicy {
    /// Banker's rounding: ties go to the even neighbour.
    #[default]
    HalfEven,
    /// Ties round away from zero.
    HalfUp,
    /// Truncate toward zero.
    Down,
}

impl RoundingPolicy {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::Down => RoundingStrategy::ToZero,
        }
    }

    /// Rounds `value` to `dp` fractional digits.
    pub fn round(&self, value: Decimal, dp: u32) -> Decimal {
        value.round_dp_with_strategy(dp, self.strategy())
    }
}
