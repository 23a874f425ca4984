//! # Money
//!
//! Every price in the engine is a whole number of minor currency units.
//! Arithmetic saturates at the `i64` bounds instead of wrapping.
//!
//! ## Cells Add Up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A walnut/maple board has ~200 cells.                                   │
//! │                                                                         │
//! │    f64:    200 × 0.35  = 70.00000000000011                              │
//! │    cents:  200 × 35    = 7000                                           │
//! │                                                                         │
//! │  Catalog, config and checkout all speak cents, so nothing converts.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use boardworks_core::money::Money;
//!
//! let walnut = Money::from_cents(450); // $4.50 per cell
//! let strip = walnut * 12_i64;
//! assert_eq!(strip.cents(), 5400);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in minor currency units.
///
/// Serializes as a bare integer so catalog and config files can write
/// `cell_price = 400`.
///
/// ## Where Money is Used
/// ```text
/// catalog price ──► per-cell unit price ──► MaterialLine.total ──┐
///                                                                ├──► BoardPrice.total
/// base table ─────► BoardPrice.base ─────────────────────────────┤
/// extras table ───► ExtraLine.amount ────────────────────────────┘
///                                                                     │
///                                        checkout_amount_minor() ◄────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Whole currency units, e.g. `from_major(200)` for a $200 base price.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole-unit part, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Minor-unit remainder, always 0-99.
    ///
    /// ```rust
    /// use boardworks_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2450).cents_part(), 50);
    /// assert_eq!(Money::from_cents(-375).cents_part(), 75);
    /// ```
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Config and catalog amounts must not be negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Charge for `qty` identical boards.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides the amount evenly across `count` units, rounding half up.
    ///
    /// Used for the per-material display unit price (`total / count`).
    /// Returns zero for a zero count.
    ///
    /// ## Example
    /// ```rust
    /// use boardworks_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).split_evenly(4).cents(), 250);
    /// assert_eq!(Money::from_cents(1000).split_evenly(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1001).split_evenly(2).cents(), 501);
    /// ```
    pub fn split_evenly(&self, count: u32) -> Money {
        if count == 0 {
            return Money::zero();
        }
        let count = count as i128;
        let amount = self.0 as i128;
        // Half-up on the magnitude so refunds mirror charges.
        let magnitude = (amount.abs() * 2 + count) / (count * 2);
        Money::from_cents((magnitude * amount.signum()) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal form, no currency symbol.
///
/// Currency symbols come from `PricingConfig::format_amount`, which knows
/// the configured currency code.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
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
    fn sub(self, rhs: Self) -> Self {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, cells: i64) -> Self {
        self.multiply_quantity(cells)
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
