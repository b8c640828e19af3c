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
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bill of Rs. 450 at 18% GST must show Rs. 81.00 of tax, and the      │
//! │  grand total must be exactly taxable + tax, never 530.9999999.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    Rs. 450.00 = 45000 paise, 18% = 1800 bps                             │
//! │    45000 × 1800 / 10000 = 8100 paise = Rs. 81.00                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_major(250);        // Rs. 250.00
//! let line = price * 2;                      // Rs. 500.00
//! assert_eq!(line.minor(), 50_000);
//! assert_eq!(line.grouped(), "500.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{DiscountRate, TaxRate};

/// Minor units per major unit (100 paise = 1 rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and balance payments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, stored as a bare integer
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.selling_price ──► CartItem line ──► Cart subtotal             │
/// │                                                   │                     │
/// │                     global discount ◄─────────────┘                     │
/// │                            │                                            │
/// │                            ▼                                            │
/// │                    taxable ──► tax ──► Sale.total                       │
/// │                                          │                              │
/// │                 Customer.outstanding_balance (credit sales)             │
/// │                 Loyalty points (1 per Rs. 100)                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // Rs. 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99);
    /// assert_eq!(price.minor(), 1099);
    ///
    /// let negative = Money::from_major_minor(-5, 50); // -Rs. 5.50
    /// assert_eq!(negative.minor(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Clamps negative values to zero.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Returns `bps / 10000` of this amount, rounded half away from zero.
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| * bps + 5000) / 10000`,
    /// then the sign is restored. i128 keeps large bills from overflowing.
    pub fn portion_bps(&self, bps: u32) -> Money {
        let magnitude = (self.0.unsigned_abs() as i128 * bps as i128 + 5000) / 10000;
        let magnitude = magnitude as i64;
        if self.0 < 0 {
            Money(-magnitude)
        } else {
            Money(magnitude)
        }
    }

    /// Calculates tax on this amount.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    /// use bazaar_core::types::TaxRate;
    ///
    /// let taxable = Money::from_major(450);
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(1800)); // 18%
    /// assert_eq!(tax, Money::from_major(81));
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Calculates the discount amount (not the discounted total).
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    /// use bazaar_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_major(500);
    /// let off = subtotal.calculate_discount(DiscountRate::from_bps(1000)); // 10%
    /// assert_eq!(off, Money::from_major(50));
    /// ```
    #[inline]
    pub fn calculate_discount(&self, rate: DiscountRate) -> Money {
        self.portion_bps(rate.bps())
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the absolute amount with thousands separators and two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(105_000).grouped(), "105,000.00");
    /// assert_eq!(Money::from_minor(-123_456).grouped(), "-1,234.56");
    /// ```
    pub fn grouped(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            group_thousands(self.major().unsigned_abs()),
            self.minor_part()
        )
    }
}

/// Inserts a comma every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parses a typed amount: `250`, `250.5`, `1,234.56`, `-20`.
///
/// At most two decimal places; anything finer is rejected, not rounded.
impl std::str::FromStr for Money {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::error::ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not an amount like 1,234.50", s),
        };

        let text: String = s.trim().chars().filter(|c| *c != ',').collect();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.to_string()),
            None => (false, text),
        };
        let (major, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        if major.is_empty()
            || fraction.len() > 2
            || !major.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = major.parse().map_err(|_| invalid())?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let value = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -value } else { value }))
    }
}

/// Display with the rupee prefix: `Rs. 1,234.56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-Rs. {}", self.abs().grouped())
        } else {
            write!(f, "Rs. {}", self.grouped())
        }
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

/// Multiplication by quantity.
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
