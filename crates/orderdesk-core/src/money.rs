//! # Money Module
//!
//! Provides the `Money` type for every price in the ordering engine.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A configured pizza: base 20 + 0.1 olives + 0.2 cheese                  │
//! │    in floating point = 20.300000000000001  ❌                           │
//! │                                                                         │
//! │  OUR SOLUTION: integer amounts in the catalog's smallest pricing unit   │
//! │    base 2000 + 10 + 20 = 2030               ✅                          │
//! │                                                                         │
//! │  The catalog decides the unit. A catalog priced in whole dollars uses   │
//! │  whole dollars; a catalog priced in cents uses cents. A fractional      │
//! │  price in the catalog is rejected, never rounded.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::money::Money;
//!
//! let base = Money::new(20);
//! let unit = base + Money::new(2) - Money::new(1);
//! assert_eq!(unit.multiply_quantity(2), Money::new(42));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the catalog's smallest pricing unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: an option delta is negative when a default option is
///   removed, and a heavily stripped product may even dip below zero
/// - **Single field tuple struct**: serializes as a bare JSON number, which is
///   exactly what the catalog and the order backend speak
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ProductDefinition.base_price ─┐                                        │
/// │  OptionDef.price (± delta) ────┴─► unit_price ──► line_total            │
/// │                                                        │                │
/// │                          Σ line_total = subtotal ◄─────┘                │
/// │                          subtotal + delivery_fee = total_price          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from an amount in the smallest pricing unit.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let fee = Money::new(20);
    /// assert_eq!(fee.amount(), 20);
    /// ```
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let unit_price = Money::new(23);
    /// assert_eq!(unit_price.multiply_quantity(2).amount(), 46);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display is for logs; the rendering layer formats amounts itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-${}", self.0.unsigned_abs())
        } else {
            write!(f, "${}", self.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds.

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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
// Unit Tests
// =============================================================================
