//! # Credit & Loyalty Commands
//!
//! Read-only rule checks plus loyalty redemption.

use bazaar_core::credit::{check_credit_limit, remaining_credit, CreditCheck};
use bazaar_core::loyalty::{amount_to_next_point, calculate_loyalty_points, points_to_monetary_value};
use bazaar_core::Money;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, Redemption};

/// What a purchase would earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyPreview {
    pub amount: Money,
    pub points: i64,
    pub amount_to_next_point: Money,
    pub points_value: Money,
}

/// Credit check for a customer against a prospective purchase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreditCheck {
    pub customer_id: String,
    pub current_balance: Money,
    pub remaining_credit: Money,
    #[serde(flatten)]
    pub check: CreditCheck,
}

/// Runs the credit limit rule on raw numbers.
pub fn credit_check(current_balance: Money, purchase: Money) -> CreditCheck {
    debug!(%current_balance, %purchase, "credit_check command");
    check_credit_limit(current_balance, purchase)
}

/// Runs the credit limit rule against a customer's stored balance.
pub async fn customer_credit_check(
    state: &AppState,
    key: &str,
    purchase: Money,
) -> Result<CustomerCreditCheck, ApiError> {
    debug!(key = %key, %purchase, "customer_credit_check command");
    let pos = state.pos.read().await;
    let customer = pos.customer(key)?;
    Ok(CustomerCreditCheck {
        customer_id: customer.id.clone(),
        current_balance: customer.outstanding_balance,
        remaining_credit: remaining_credit(customer.outstanding_balance),
        check: check_credit_limit(customer.outstanding_balance, purchase),
    })
}

pub fn loyalty_preview(amount: Money) -> LoyaltyPreview {
    debug!(%amount, "loyalty_preview command");
    let points = calculate_loyalty_points(amount);
    LoyaltyPreview {
        amount,
        points,
        amount_to_next_point: amount_to_next_point(amount),
        points_value: points_to_monetary_value(points),
    }
}

pub async fn redeem_points(state: &AppState, key: &str, points: i64) -> Result<Redemption, ApiError> {
    debug!(key = %key, points, "redeem_points command");
    let mut pos = state.pos.write().await;
    let id = pos.customer(key)?.id.clone();
    Ok(pos.redeem_loyalty_points(&id, points).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loyalty_preview() {
        let preview = loyalty_preview(Money::from_major(250));
        assert_eq!(preview.points, 2);
        assert_eq!(preview.amount_to_next_point, Money::from_major(50));
        assert_eq!(preview.points_value, Money::from_major(200));
    }

    #[test]
    fn test_credit_check_warning_band() {
        let check = credit_check(Money::from_major(80_000), Money::from_major(12_000));
        assert!(check.can_proceed);
        assert!(!check.message.is_empty());
        assert_eq!(check.new_balance, Money::from_major(92_000));
    }
}
