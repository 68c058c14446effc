//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Order forms built on floats drift:                                     │
//! │    285 - 100.1 = 184.89999999999998  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    28500 - 10010 = 18490 cents = 184.90                                │
//! │                                                                         │
//! │  Text from input fields is parsed straight to cents, never via f64.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shelf_core::money::Money;
//!
//! let price = Money::parse("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let total = price * 3;
//! assert_eq!(total.to_string(), "$32.97");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction results (grand − paid) can go negative
///   before they are floored
/// - **Saturating operators**: sums of operator-typed amounts never panic;
///   use [`Money::checked_mul_quantity`] where overflow must be reported
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  StockLot.sale_price ──► LineItem.unit_price ──► LineItem.total_price  │
/// │                                                                         │
/// │  Cart subtotal ──► VAT / discount ──► grand total ──► paid / due       │
/// │                                                                         │
/// │  OrderPayload amounts ──► "285.00" strings on the wire                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Parses decimal text such as `"12.50"`, `"7"` or `"-3.2"`.
    ///
    /// Digits past the second decimal place round half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    ///
    /// assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse("0.125").unwrap().cents(), 13);
    /// assert!(Money::parse("12,50").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Money, ValidationError> {
        let trimmed = text.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' {}", trimmed, reason),
        };

        let value = Decimal::from_str(trimmed).map_err(|_| invalid("is not a decimal amount"))?;
        value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(|| invalid("is out of range"))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value floored at zero.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(500).floor_zero().cents(), 500);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Restricts the value to `[low, high]`. `low` wins if the range is inverted.
    #[inline]
    pub fn clamp_to(self, low: Money, high: Money) -> Money {
        if self > high {
            high.max(low)
        } else if self < low {
            low
        } else {
            self
        }
    }

    /// Percentage of this amount, rounded half-up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    /// use shelf_core::types::Rate;
    ///
    /// let subtotal = Money::from_major(300);
    /// assert_eq!(subtotal.percent(Rate::from_bps(500)), Money::from_major(15));
    /// ```
    pub fn percent(&self, rate: Rate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Line total for a quantity; `None` when it does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(50).checked_mul_quantity(3), Some(Money::from_major(150)));
    /// assert_eq!(Money::from_major(50).checked_mul_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats as plain decimal text (`"285.00"`, `"-5.50"`), the wire format.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().unsigned_abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display; the desk config formats with the store currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter that writes Money as a two-decimal string (`"285.00"`).
///
/// Reading accepts decimal strings and JSON numbers, since the backend
/// returns both depending on the column type.
///
/// ```rust,ignore
/// #[serde(with = "shelf_core::money::decimal")]
/// pub grand_amount: Money,
/// ```
pub mod decimal {
    use super::Money;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom("amount out of range"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            i64::try_from(v)
                .map_err(|_| E::custom("amount out of range"))
                .and_then(|v| self.visit_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            Money::parse(&format!("{:.3}", v)).map_err(E::custom)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
