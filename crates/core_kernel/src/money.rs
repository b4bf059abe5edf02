//! Money types with precise decimal arithmetic
//!
//! Claimed amounts, cost estimates and coverage ceilings are all carried as
//! [`Money`] so that the financial checks compare exact decimals and never
//! mix currencies silently. Conversion between currencies is the caller's
//! concern; this module only refuses to combine amounts that disagree.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    INR,
    USD,
    EUR,
    GBP,
    JPY,
    AUD,
    CAD,
    SGD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::SGD => "S$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 decimal places internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from a whole number of major units (rupees, dollars)
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(Decimal::from(units), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Fails unless `other` is in the same currency
    pub fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }

    /// Checked addition, failing on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(sum, self.currency))
    }

    /// Multiplies by a scalar, failing on overflow
    pub fn checked_multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(product, self.currency))
    }

    /// Returns `self / other` as a plain ratio
    pub fn ratio_to(&self, other: &Money) -> Result<Decimal, MoneyError> {
        self.ensure_same_currency(other)?;
        if other.amount.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(self.amount / other.amount)
    }

    /// Returns the amount halfway between `self` and `other`
    pub fn midpoint(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        // halve first so the sum of two large amounts cannot overflow
        let half = (self.amount / dec!(2))
            .checked_add(other.amount / dec!(2))
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(half, self.currency))
    }

    /// Compares two amounts, failing on currency mismatch
    pub fn checked_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Returns true if `self` is strictly greater than `other`
    ///
    /// Amounts in different currencies never compare greater.
    pub fn exceeds(&self, other: &Money) -> bool {
        matches!(self.checked_cmp(other), Ok(Ordering::Greater))
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{}{:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(15000.50), Currency::INR);
        assert_eq!(m.amount(), dec!(15000.50));
        assert_eq!(m.currency(), Currency::INR);
    }

    #[test]
    fn test_from_major() {
        let m = Money::from_major(20_000, Currency::INR);
        assert_eq!(m.amount(), dec!(20000));
    }

    #[test]
    fn test_currency_mismatch() {
        let inr = Money::from_major(100, Currency::INR);
        let usd = Money::from_major(100, Currency::USD);

        let result = inr.checked_add(&usd);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
        assert!(!inr.exceeds(&Money::zero(Currency::USD)));
    }

    #[test]
    fn test_ratio_to() {
        let claimed = Money::from_major(45_000, Currency::INR);
        let estimate = Money::from_major(20_000, Currency::INR);
        assert_eq!(claimed.ratio_to(&estimate).unwrap(), dec!(2.25));
        assert_eq!(
            claimed.ratio_to(&Money::zero(Currency::INR)),
            Err(MoneyError::DivisionByZero)
        );
    }

    #[test]
    fn test_arithmetic_at_decimal_max() {
        let max = Money::new(Decimal::MAX, Currency::INR);
        let one = Money::from_major(1, Currency::INR);

        assert_eq!(max.checked_multiply(dec!(2)), Err(MoneyError::Overflow));
        assert_eq!(max.checked_add(&max), Err(MoneyError::Overflow));
        assert!(one.midpoint(&max).unwrap().amount() > one.amount());
        assert_eq!(one.checked_multiply(dec!(3)).unwrap().amount(), dec!(3));
    }

    #[test]
    fn test_midpoint() {
        let low = Money::from_major(8_000, Currency::INR);
        let high = Money::from_major(12_000, Currency::INR);
        assert_eq!(low.midpoint(&high).unwrap().amount(), dec!(10000));
    }

    #[test]
    fn test_sign_predicates() {
        assert!(!Money::zero(Currency::INR).is_negative());
        assert!(!Money::zero(Currency::INR).is_positive());
        assert!(Money::new(dec!(-1), Currency::INR).is_negative());
    }

    #[test]
    fn test_display() {
        let m = Money::new(dec!(15000), Currency::INR);
        assert_eq!(m.to_string(), "₹15000.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn midpoint_lies_between_bounds(a in 0i64..10_000_000i64, b in 0i64..10_000_000i64) {
            let low = Money::from_major(a.min(b), Currency::INR);
            let high = Money::from_major(a.max(b), Currency::INR);
            let mid = low.midpoint(&high).unwrap();

            prop_assert!(mid.amount() >= low.amount());
            prop_assert!(mid.amount() <= high.amount());
        }

        #[test]
        fn exceeds_agrees_with_decimal_ordering(a in 0i64..1_000_000i64, b in 0i64..1_000_000i64) {
            let ma = Money::from_major(a, Currency::INR);
            let mb = Money::from_major(b, Currency::INR);
            prop_assert_eq!(ma.exceeds(&mb), a > b);
        }
    }
}
