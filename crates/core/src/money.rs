//! Monetary amounts.
//!
//! Prices enter the system as loosely-typed JSON (numbers or numeric strings)
//! and are normalized here into a single non-negative decimal representation.
//! Anything that does not parse is rejected with a [`MoneyError`]; nothing is
//! silently coerced to zero.
//!
//! Accepted amounts are capped at [`MAX_AMOUNT`] with at most
//! [`MAX_INPUT_SCALE`] decimal places. The cap keeps sums of any request-sized
//! item list far from `Decimal`'s range, and together with the scale limit it
//! keeps every input within the 15 significant digits a JSON number carries
//! exactly. Totals stay exact on the wire while below `10^11`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of decimal places money is rounded to on output.
pub const MONEY_SCALE: u32 = 2;

/// Most decimal places an input amount may carry.
pub const MAX_INPUT_SCALE: u32 = 4;

/// Largest accepted amount (one billion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid price '{0}': not a number")]
    NotANumber(String),

    #[error("invalid price '{0}': must not be negative")]
    Negative(String),

    #[error("invalid price: value is not finite")]
    NotFinite,

    #[error("invalid price '{0}': must not exceed 1000000000")]
    TooLarge(String),

    #[error("invalid price '{0}': at most 4 decimal places")]
    TooPrecise(String),
}

/// Non-negative decimal amount in the store currency.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount.to_string()));
        }
        if amount > MAX_AMOUNT {
            return Err(MoneyError::TooLarge(amount.to_string()));
        }
        let amount = amount.normalize();
        if amount.scale() > MAX_INPUT_SCALE {
            return Err(MoneyError::TooPrecise(amount.to_string()));
        }
        Ok(Self(amount))
    }

    /// Amount expressed in the smallest currency unit (cents).
    ///
    /// Not range-checked; for fixtures and trusted constants.
    pub fn from_cents(cents: u64) -> Self {
        debug_assert!(Decimal::from(cents) <= MAX_AMOUNT * Decimal::ONE_HUNDRED);
        Self(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| MoneyError::NotANumber(s.to_string()))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to two decimal places, half-up (midpoint away from zero).
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply by a non-negative factor without rounding.
    pub fn scale(self, factor: Decimal) -> Self {
        debug_assert!(!factor.is_sign_negative());
        Self(self.0 * factor)
    }

    /// Subtract, saturating at zero.
    pub fn saturating_sub(self, other: Money) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Nearest `f64`; parsed from the decimal digits so it prints back as
    /// the same digits.
    pub fn to_f64(&self) -> f64 {
        self.0.to_string().parse().unwrap_or_default()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        // `Display` for f64 prints the shortest round-trip form without an
        // exponent, so 29.99 parses back as exactly 29.99.
        Money::parse(&value.to_string())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative price as a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Money::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Money::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
