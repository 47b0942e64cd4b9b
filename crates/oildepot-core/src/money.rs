//! # Money Module
//!
//! Provides the `Rupee` type for handling monetary values safely.
//!
//! ## Why Integer Rupees?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupees                                           │
//! │    The business works in whole rupees; no paise are modeled.            │
//! │    Rates are real numbers (₹/kg), but they cross into currency at      │
//! │    exactly one rounding point: Rupee::from_f64_rounded.                 │
//! │                                                                         │
//! │  DISPLAY: Indian digit grouping                                         │
//! │    453800 → "₹4,53,800"   (last group of 3, then groups of 2)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use oildepot_core::money::Rupee;
//!
//! // Create from whole rupees
//! let price = Rupee::from_rupees(1768);
//!
//! // Arithmetic operations
//! let revenue = price.multiply_quantity(52);       // ₹91,936
//! let total = price + Rupee::from_rupees(3900);    // ₹5,668
//!
//! assert_eq!(format!("{}", revenue), "₹91,936");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Rupee Type
// =============================================================================

/// Represents a monetary value in whole rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for cash-short variances
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Rupee is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  PriceRecord.unit_price() ──► StockSnapshot.revenue                     │
/// │                                                                         │
/// │  Payment breakdowns ──► reconcile ──► cashOverShort (signed)            │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rupee(i64);

impl Rupee {
    /// Creates a Rupee value from a whole-rupee amount.
    ///
    /// ## Example
    /// ```rust
    /// use oildepot_core::money::Rupee;
    ///
    /// let price = Rupee::from_rupees(3900);
    /// assert_eq!(price.rupees(), 3900);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Rupee(rupees)
    }

    /// Rounds a real-valued amount to the nearest whole rupee
    /// (half away from zero).
    ///
    /// This is the only point where floating-point rates become currency;
    /// everything downstream is integer arithmetic.
    ///
    /// ## Example
    /// ```rust
    /// use oildepot_core::money::Rupee;
    ///
    /// // 130 ₹/kg × 0.45 kg/unit
    /// assert_eq!(Rupee::from_f64_rounded(58.5).rupees(), 59);
    /// assert_eq!(Rupee::from_f64_rounded(1768.0).rupees(), 1768);
    /// ```
    #[inline]
    pub fn from_f64_rounded(amount: f64) -> Self {
        Rupee(amount.round() as i64)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use oildepot_core::money::Rupee;
    ///
    /// let zero = Rupee::zero();
    /// assert_eq!(zero.rupees(), 0);
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Rupee(0)
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
    ///
    /// ## Example
    /// ```rust
    /// use oildepot_core::money::Rupee;
    ///
    /// let short = Rupee::from_rupees(-6000);
    /// assert_eq!(short.abs().rupees(), 6000);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Rupee(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use oildepot_core::money::Rupee;
    ///
    /// let unit_price = Rupee::from_rupees(1768);
    /// let revenue = unit_price.multiply_quantity(52);
    /// assert_eq!(revenue.rupees(), 91936);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Rupee(self.0 * qty)
    }

    /// Renders the absolute value with Indian digit grouping.
    ///
    /// ## Rules
    /// The last group has three digits, every group before it has two:
    /// `8,000` / `1,20,000` / `4,53,800` / `1,23,45,678`.
    fn grouped_abs(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let len = digits.len();
        if len <= 3 {
            return digits;
        }

        let (head, tail) = digits.split_at(len - 3);
        let mut out = String::with_capacity(len + len / 2);
        // Leading group of the head is 1 or 2 digits, the rest are 2.
        let mut group = head.len() % 2;
        if group == 0 {
            group = 2;
        }
        let mut idx = 0;
        while idx < head.len() {
            if idx > 0 {
                out.push(',');
            }
            out.push_str(&head[idx..idx + group]);
            idx += group;
            group = 2;
        }
        out.push(',');
        out.push_str(tail);
        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the en-IN presentation form used by the report texts:
/// sign, rupee symbol, grouped digits (`-₹6,000`).
impl fmt::Display for Rupee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}", sign, self.grouped_abs())
    }
}

/// Default money is zero.
impl Default for Rupee {
    fn default() -> Self {
        Rupee::zero()
    }
}

/// Addition of two Rupee values.
impl Add for Rupee {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Rupee(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Rupee {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Rupee values.
impl Sub for Rupee {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Rupee(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Rupee {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Rupee {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Rupee(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Rupee {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Rupee(self.0 * qty)
    }
}

/// Summation over iterators of Rupee (expense totals, aggregate KPIs).
impl Sum for Rupee {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Rupee::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
