//! Fixed-point monetary amounts.
//!
//! Balances are stored as an unsigned count of hundredths ("cents"). This keeps
//! arithmetic exact, makes negative balances unrepresentable, and gives every
//! amount a single canonical textual form (`1234.50`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of minor units in one whole unit.
pub const CENTS_PER_UNIT: u64 = 100;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Errors produced when parsing or combining amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount cannot be negative")]
    Negative,

    #[error("invalid character in amount: {0:?}")]
    InvalidDigit(String),

    #[error("amount has more than two decimal places")]
    TooPrecise,

    #[error("amount overflow")]
    Overflow,
}

/// A non-negative decimal amount with two fractional digits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole units.
    pub const fn from_units(units: u64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    /// Create an amount from hundredths.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Get the raw count of hundredths.
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Check if this is the zero amount.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum of `amounts`, or `None` if the total does not fit.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Proportional share of this amount, rounded down to the nearest cent.
    ///
    /// `bps` is expressed in basis points (250 = 2.5%).
    pub fn portion_bps(self, bps: u32) -> Self {
        let scaled = u128::from(self.0) * u128::from(bps) / u128::from(BPS_DENOMINATOR);
        // bps <= 10_000 keeps the result <= self; larger rates saturate.
        Self(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / CENTS_PER_UNIT,
            self.0 % CENTS_PER_UNIT
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::Empty);
        }
        if frac.len() > 2 {
            return Err(AmountError::TooPrecise);
        }
        if let Some(bad) = whole.chars().chain(frac.chars()).find(|c| !c.is_ascii_digit()) {
            return Err(AmountError::InvalidDigit(bad.to_string()));
        }

        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| AmountError::Overflow)?
        };
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| AmountError::Overflow)? * 10,
            _ => frac.parse().map_err(|_| AmountError::Overflow)?,
        };

        units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or(AmountError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::from_units(200).to_string(), "200.00");
        assert_eq!(Amount::from_cents(2_505).to_string(), "25.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("200".parse::<Amount>().unwrap(), Amount::from_units(200));
        assert_eq!("200.5".parse::<Amount>().unwrap(), Amount::from_cents(20_050));
        assert_eq!(" 0.07 ".parse::<Amount>().unwrap(), Amount::from_cents(7));
        assert_eq!(".5".parse::<Amount>().unwrap(), Amount::from_cents(50));
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!(".".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("-5".parse::<Amount>(), Err(AmountError::Negative));
        assert_eq!("1.234".parse::<Amount>(), Err(AmountError::TooPrecise));
        assert!(matches!(
            "12a".parse::<Amount>(),
            Err(AmountError::InvalidDigit(_))
        ));
        assert_eq!(
            "999999999999999999999".parse::<Amount>(),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn test_portion_bps_rounds_down() {
        let balance = Amount::from_units(1000);
        assert_eq!(balance.portion_bps(250), Amount::from_units(25));

        // 2.5% of 0.99 is 0.02475, floored to 0.02
        assert_eq!(Amount::from_cents(99).portion_bps(250), Amount::from_cents(2));
        assert_eq!(balance.portion_bps(0), Amount::ZERO);
        assert_eq!(balance.portion_bps(10_000), balance);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Amount::from_units(5);
        let b = Amount::from_units(7);
        assert_eq!(a.checked_sub(b), None);
        assert_eq!(b.checked_sub(a), Some(Amount::from_units(2)));
        assert_eq!(Amount::from_cents(u64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_checked_sum() {
        let parts = [Amount::from_units(1), Amount::from_cents(50), Amount::ZERO];
        assert_eq!(Amount::checked_sum(parts), Some(Amount::from_cents(150)));
        assert_eq!(Amount::checked_sum(std::iter::empty()), Some(Amount::ZERO));

        let big = Amount::from_cents(u64::MAX / 2 + 1);
        assert_eq!(Amount::checked_sum([big, big]), None);
    }
}
