//! Money types with precise decimal arithmetic
//!
//! Premiums and commissions are held as `rust_decimal::Decimal` so that
//! commission totals never pick up floating-point drift. All amounts are in
//! Brazilian reais; the brokerage never handles a second currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use thiserror::Error;

/// Largest number of digits a stored premium may carry
pub const PREMIUM_MAX_DIGITS: u32 = 8;

/// Number of decimal places a stored premium may carry
pub const PREMIUM_DECIMAL_PLACES: u32 = 2;

/// Highest commission percentage a policy may carry
pub const MAX_COMMISSION_PERCENTAGE: u32 = 50;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Ensure that there are no more than {0} digits in total.")]
    TooManyDigits(u32),

    #[error("Ensure that there are no more than {0} decimal places.")]
    TooManyDecimalPlaces(u32),

    #[error("Ensure that there are no more than {0} digits before the decimal point.")]
    TooManyWholeDigits(u32),

    #[error("Ensure this value is less than or equal to {0}.")]
    RateOutOfRange(u32),
}

/// A monetary amount in reais
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a new Money value without any precision check
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Creates a premium amount, enforcing the stored precision of
    /// 8 digits with 2 decimal places
    pub fn premium(amount: Decimal) -> Result<Self, MoneyError> {
        check_premium_precision(amount)?;
        Ok(Self { amount })
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self { amount: dec!(0) }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Rounds to centavos using banker's rounding
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                2,
                rust_decimal::RoundingStrategy::MidpointNearestEven,
            ),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {:.2}", self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Checks that a decimal fits the premium column: at most 8 digits in total,
/// at most 2 of them after the decimal point
///
/// Trailing zeros in the fractional part do not count, so `2000.00` and
/// `2000` are both accepted.
pub fn check_premium_precision(amount: Decimal) -> Result<(), MoneyError> {
    let normalized = amount.normalize();
    let decimal_places = normalized.scale();
    let digits = significant_digits(normalized);
    let whole_digits = digits.saturating_sub(decimal_places);

    if digits > PREMIUM_MAX_DIGITS {
        return Err(MoneyError::TooManyDigits(PREMIUM_MAX_DIGITS));
    }
    if decimal_places > PREMIUM_DECIMAL_PLACES {
        return Err(MoneyError::TooManyDecimalPlaces(PREMIUM_DECIMAL_PLACES));
    }
    if whole_digits > PREMIUM_MAX_DIGITS - PREMIUM_DECIMAL_PLACES {
        return Err(MoneyError::TooManyWholeDigits(
            PREMIUM_MAX_DIGITS - PREMIUM_DECIMAL_PLACES,
        ));
    }
    Ok(())
}

/// Counts the digits of the mantissa, treating `0.05` as having the digits
/// `005` the same way a fixed-point column would
fn significant_digits(value: Decimal) -> u32 {
    let mantissa = value.mantissa().unsigned_abs();
    let mantissa_digits = if mantissa == 0 {
        1
    } else {
        mantissa.to_string().len() as u32
    };
    mantissa_digits.max(value.scale())
}

/// A commission percentage between 0 and 50
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionRate {
    percentage: u32,
}

impl CommissionRate {
    /// Creates a rate from a whole-number percentage
    pub fn new(percentage: u32) -> Result<Self, MoneyError> {
        if percentage > MAX_COMMISSION_PERCENTAGE {
            return Err(MoneyError::RateOutOfRange(MAX_COMMISSION_PERCENTAGE));
        }
        Ok(Self { percentage })
    }

    /// Returns the percentage (e.g. 10 for 10%)
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    /// Returns the rate as a decimal fraction (e.g. 0.10 for 10%)
    pub fn as_fraction(&self) -> Decimal {
        Decimal::from(self.percentage) / dec!(100)
    }

    /// Applies this rate to an amount: `amount × percentage / 100`
    ///
    /// The multiplication happens before the division so that the result is
    /// exact for every premium the column can hold.
    pub fn apply(&self, money: &Money) -> Money {
        Money::new(commission_on(money.amount(), self.percentage))
    }
}

/// Commission owed on a premium: `premium × percentage / 100`, unrounded
///
/// Stored policies already carry a percentage within range, so this takes the
/// raw value instead of a [`CommissionRate`].
pub fn commission_on(premium: Decimal, percentage: u32) -> Decimal {
    premium * Decimal::from(percentage) / dec!(100)
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage)
    }
}
