//! Money type
//!
//! Domain primitive for card payment amounts. Amounts are whole currency
//! units: every value is rounded to zero decimal places (half-up) when it is
//! constructed, so no fractional amount can exist in the system.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept after rounding
const SCALE: u32 = 0;

/// Money represents a validated, non-negative amount.
///
/// # Invariants
/// - Value is never negative
/// - Value carries no fractional digits
///
/// # Example
/// ```
/// use card_service::domain::Money;
///
/// let price = Money::of(10_000).unwrap();
/// let fee = Money::of(500).unwrap();
/// assert_eq!(price.add(&fee).unwrap(), Money::of(10_500).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// Errors that can occur when creating or combining Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: Decimal, requested: Decimal },

    #[error("Amount exceeds the representable range")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    Parse(String),
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create Money from an integer or a decimal.
    ///
    /// # Errors
    /// - `MoneyError::InvalidAmount` if the value is negative
    pub fn of(amount: impl Into<Decimal>) -> Result<Self, MoneyError> {
        let value = amount.into();

        if value < Decimal::ZERO {
            return Err(MoneyError::InvalidAmount(value));
        }
        if value.is_zero() {
            return Ok(Self::ZERO);
        }

        let rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self(rounded))
    }

    /// Money from a count of whole units. Cannot fail: the value is
    /// non-negative and has no fractional digits.
    pub fn from_whole(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying Decimal value.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_greater_than(&self, other: &Money) -> bool {
        self.0 > other.0
    }

    pub fn is_greater_than_or_equal(&self, other: &Money) -> bool {
        self.0 >= other.0
    }

    pub fn is_less_than_or_equal(&self, other: &Money) -> bool {
        self.0 <= other.0
    }

    /// Sum of two amounts.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Difference of two amounts; never goes below zero.
    ///
    /// # Errors
    /// - `MoneyError::InsufficientBalance` if `other` is larger than `self`
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        if other.0 > self.0 {
            return Err(MoneyError::InsufficientBalance {
                balance: self.0,
                requested: other.0,
            });
        }
        Money::of(self.0 - other.0)
    }

    /// Whether `self + request` stays within `limit`.
    ///
    /// `self` is the amount already used against the limit.
    pub fn is_within_limit(&self, request: &Money, limit: &Money) -> bool {
        self.add(request)
            .map(|total| total.is_less_than_or_equal(limit))
            .unwrap_or(false)
    }

    /// Whole-unit value; saturates at `i64::MAX`.
    pub fn to_i64(&self) -> i64 {
        self.0.to_i64().unwrap_or(i64::MAX)
    }

    /// Human readable won amount, e.g. `1,250,000원`.
    pub fn formatted(&self) -> String {
        let digits = self.0.trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped.push('원');
        grouped
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim()).map_err(|e| MoneyError::Parse(e.to_string()))?;
        Money::of(decimal)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::of(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

// Add/Sub operators are not implemented: both can fail and callers must see why.
