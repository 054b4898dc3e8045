//! Money amounts in the smallest currency unit.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Balances and invoice totals are signed 64-bit integers of minor units
//! (cents, satoshis, ...). All arithmetic is checked.

use serde::{Deserialize, Serialize};

/// A signed amount in the smallest unit of some currency.
///
/// The currency itself travels with the account, not with the amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is above zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition. `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked negation. `None` for `i64::MIN`.
    #[must_use]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.0.checked_neg() {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Self(minor)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_money_zero() {
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::ZERO.is_positive());
        assert_eq!(Money::default(), Money::ZERO);
    }

    #[rstest]
    #[case(100, false, true)]
    #[case(-1, true, false)]
    #[case(0, false, false)]
    fn test_money_sign(#[case] minor: i64, #[case] negative: bool, #[case] positive: bool) {
        let money = Money::new(minor);
        assert_eq!(money.is_negative(), negative);
        assert_eq!(money.is_positive(), positive);
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(Money::new(1000).checked_sub(Money::new(100)), Some(Money::new(900)));
        assert_eq!(Money::new(100).checked_sub(Money::new(101)), Some(Money::new(-1)));
        assert_eq!(Money::new(100).checked_add(Money::new(1000)), Some(Money::new(1100)));
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
        assert_eq!(Money::new(i64::MIN).checked_neg(), None);
        assert_eq!(Money::new(5).checked_neg(), Some(Money::new(-5)));
    }

    #[test]
    fn test_display_is_minor_units() {
        assert_eq!(Money::new(-250).to_string(), "-250");
    }
}
