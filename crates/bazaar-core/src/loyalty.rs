//! # Loyalty Points
//!
//! One point for every full Rs. 100 spent.
//!
//! ```text
//!   Rs. 250.00 ──► 2 points, Rs. 50.00 to the next point
//!   Rs. 300.00 ──► 3 points, Rs. 100.00 to the next point
//! ```

use crate::money::Money;

/// Spend required for one point.
pub const AMOUNT_PER_POINT: Money = Money::from_major(100);

/// Points earned for a bill. Negative totals earn nothing.
///
/// ## Example
/// ```rust
/// use bazaar_core::loyalty::calculate_loyalty_points;
/// use bazaar_core::Money;
///
/// assert_eq!(calculate_loyalty_points(Money::from_major(250)), 2);
/// assert_eq!(calculate_loyalty_points(Money::from_major(99)), 0);
/// ```
pub fn calculate_loyalty_points(total_amount: Money) -> i64 {
    if total_amount.is_negative() {
        return 0;
    }
    total_amount.minor() / AMOUNT_PER_POINT.minor()
}

/// Spend still needed to reach the next point.
///
/// Always in `(0, 100]`: an exact multiple of 100 needs a full 100 more.
pub fn amount_to_next_point(total_amount: Money) -> Money {
    let step = AMOUNT_PER_POINT.minor();
    let into_tier = total_amount.non_negative().minor() % step;
    Money::from_minor(step - into_tier)
}

/// Monetary value of a points balance (`points × 100`).
pub fn points_to_monetary_value(points: i64) -> Money {
    AMOUNT_PER_POINT.multiply_quantity(points)
}

/// Clamps a redemption request to `[0, available]`.
pub fn redeemable_points(available: i64, requested: i64) -> i64 {
    requested.clamp(0, available.max(0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        assert_eq!(calculate_loyalty_points(Money::from_major(250)), 2);
        assert_eq!(calculate_loyalty_points(Money::from_major(99)), 0);
        assert_eq!(calculate_loyalty_points(Money::from_major(-5)), 0);
        assert_eq!(calculate_loyalty_points(Money::from_minor(19_999)), 1);
    }

    #[test]
    fn test_amount_to_next_point() {
        assert_eq!(amount_to_next_point(Money::from_major(250)), Money::from_major(50));
        assert_eq!(amount_to_next_point(Money::from_major(300)), Money::from_major(100));
        assert_eq!(amount_to_next_point(Money::from_minor(25_050)), Money::from_minor(4_950));
        assert_eq!(amount_to_next_point(Money::from_major(-20)), Money::from_major(100));
    }

    #[test]
    fn test_monetary_value() {
        assert_eq!(points_to_monetary_value(3), Money::from_major(300));
        assert_eq!(points_to_monetary_value(0), Money::zero());
    }

    #[test]
    fn test_redeemable_points() {
        assert_eq!(redeemable_points(10, 4), 4);
        assert_eq!(redeemable_points(10, 40), 10);
        assert_eq!(redeemable_points(10, -1), 0);
        assert_eq!(redeemable_points(-2, 5), 0);
    }
}
