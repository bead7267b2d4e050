//! Money with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point
//! errors. All amounts are normalised to 2 decimal places on construction,
//! which is the fixed precision of the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Number of decimal places every amount is rounded to.
pub const DECIMAL_PLACES: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Negative amount where a non-negative one is required: {0}")]
    NegativeAmount(Decimal),
}

/// A monetary amount with fixed 2-decimal precision
///
/// `Money` is signed: a positive account balance means the account owes
/// money, a negative one means the account holds credit. Individual ledger
/// entry amounts are additionally validated to be non-negative via
/// [`Money::require_non_negative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rounding to 2 decimal places
    /// (banker's rounding, round half to even)
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(
            DECIMAL_PLACES,
            rust_decimal::RoundingStrategy::MidpointNearestEven,
        ))
    }

    /// Creates Money from an integer amount in minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, DECIMAL_PLACES))
    }

    /// The zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the smaller of two amounts
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    /// Returns the larger of two amounts
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }

    /// Clamps a possibly-negative amount to zero
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() { Self::zero() } else { self }
    }

    /// Validates that the amount is non-negative
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NegativeAmount`] if the amount is below zero
    pub fn require_non_negative(self) -> Result<Self, MoneyError> {
        if self.is_negative() {
            Err(MoneyError::NegativeAmount(self.0))
        } else {
            Ok(self)
        }
    }

    /// Validates that the amount is strictly positive
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] if the amount is zero or below
    pub fn require_positive(self) -> Result<Self, MoneyError> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(MoneyError::InvalidAmount(format!(
                "expected a positive amount, got {}",
                self.0
            )))
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation_rounds_to_two_places() {
        let m = Money::new(dec!(100.505));
        assert_eq!(m.amount(), dec!(100.50));

        let m = Money::new(dec!(100.515));
        assert_eq!(m.amount(), dec!(100.52));
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
        assert_eq!((b - a).amount(), dec!(-50.00));
    }

    #[test]
    fn test_money_signs() {
        assert!(Money::new(dec!(1)).is_positive());
        assert!(Money::new(dec!(-1)).is_negative());
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(!Money::zero().is_positive());
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::new(dec!(-5)).clamp_non_negative(), Money::zero());
        assert_eq!(
            Money::new(dec!(5)).clamp_non_negative(),
            Money::new(dec!(5))
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(Money::zero().require_non_negative().is_ok());
        assert!(matches!(
            Money::new(dec!(-0.01)).require_non_negative(),
            Err(MoneyError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_require_positive() {
        assert!(Money::new(dec!(0.01)).require_positive().is_ok());
        assert!(Money::zero().require_positive().is_err());
        assert!(Money::new(dec!(-1)).require_positive().is_err());
    }

    #[test]
    fn test_min_max() {
        let a = Money::new(dec!(3));
        let b = Money::new(dec!(7));
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_addition_is_commutative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a);
            let mb = Money::from_minor(b);
            prop_assert_eq!(ma + mb, mb + ma);
        }

        #[test]
        fn money_sum_matches_fold(
            amounts in proptest::collection::vec(-100_000i64..100_000i64, 0..50)
        ) {
            let monies: Vec<Money> = amounts.iter().copied().map(Money::from_minor).collect();
            let summed: Money = monies.iter().copied().sum();
            let folded = monies.iter().fold(Money::zero(), |acc, m| acc + *m);
            prop_assert_eq!(summed, folded);
        }

        #[test]
        fn minor_units_round_trip(a in -1_000_000i64..1_000_000i64) {
            let m = Money::from_minor(a);
            prop_assert_eq!(m.amount() * rust_decimal::Decimal::new(100, 0), rust_decimal::Decimal::new(a, 0));
        }
    }
}
