//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    5.00 + 4.99 - 10.00 = -0.010000000000000009  ❌ WRONG!              │
//! │                                                                         │
//! │  Splitting a dinner three ways:                                         │
//! │    $10.00 / 3 = $3.33 (×3 = $9.99)  → Lost $0.01!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    1000 cents / 3 = 333 cents (×3 = 999 cents)                         │
//! │    We KNOW we lost 1 cent, and the payer absorbs it explicitly         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tripsplit_core::money::Money;
//!
//! // Create from minor units (cents for USD)
//! let dinner = Money::from_minor(1000); // $10.00
//!
//! // Equal split: share plus the remainder nobody is charged
//! let (share, remainder) = dinner.split_evenly(3);
//! assert_eq!(share.minor(), 333);
//! assert_eq!(remainder.minor(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Net balances are negative for debtors
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer**: `{"amount": 2500}` on the wire
///
/// ## Where Money Flows
/// ```text
/// Expense.amount ──► Split Calculator ──► ResolvedSplit.amount
///                                              │
///                                              ▼
///                    NetBalance.paid / owed ◄── Balance Aggregator
///                              │
///                              ▼
///                    Settlement Planner ──► Settlement.amount
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use tripsplit_core::money::Money;
    ///
    /// let hotel = Money::from_minor(12_550); // $125.50
    /// assert_eq!(hotel.minor(), 12_550);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor parts (dollars and cents).
    ///
    /// For negative amounts only the major part carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (dollars for USD).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion, always 0-99.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Divides this amount evenly between `parts` people.
    ///
    /// Returns `(share, remainder)` where `share = floor(self / parts)` and
    /// `remainder = self mod parts`. The remainder is never handed out to
    /// anyone; callers book it to whoever paid.
    ///
    /// ## Example
    /// ```rust
    /// use tripsplit_core::money::Money;
    ///
    /// let (share, rest) = Money::from_minor(3000).split_evenly(3);
    /// assert_eq!((share.minor(), rest.minor()), (1000, 0));
    ///
    /// let (share, rest) = Money::from_minor(1000).split_evenly(3);
    /// assert_eq!((share.minor(), rest.minor()), (333, 1));
    /// ```
    ///
    /// ## Panics
    /// Panics if `parts` is zero. The split calculator rejects empty
    /// participant lists before it ever gets here.
    pub fn split_evenly(&self, parts: usize) -> (Money, Money) {
        let parts = parts as i64;
        (
            Money(self.0.div_euclid(parts)),
            Money(self.0.rem_euclid(parts)),
        )
    }

    /// Returns `floor(self × percentage / 100)`.
    ///
    /// The percentage is held in basis points, so the math is
    /// `floor(minor × bps / 10_000)` on an i128 intermediate.
    ///
    /// ## Example
    /// ```rust
    /// use tripsplit_core::money::Money;
    /// use tripsplit_core::types::Percentage;
    ///
    /// let total = Money::from_minor(1000);
    /// let third = Percentage::from_bps(3333); // 33.33%
    /// assert_eq!(total.percentage_of(third).minor(), 333);
    /// ```
    pub fn percentage_of(&self, percentage: Percentage) -> Money {
        let scaled = (self.0 as i128 * percentage.bps() as i128)
            .div_euclid(Percentage::HUNDRED.bps() as i128);
        Money(scaled as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`-5.50`). Currency symbols and localisation are
/// left to whoever displays the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
