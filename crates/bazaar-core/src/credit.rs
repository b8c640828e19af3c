//! # Credit Limit Rules
//!
//! Pure functions deciding whether a customer may buy on credit.
//!
//! ## Thresholds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  balance after purchase                                                 │
//! │                                                                         │
//! │  0 ───────────── 75,000 ─────── 90,000 ─────── 100,000 ──────────►      │
//! │  │   no message    │   badge:     │  soft warn    │   BLOCKED           │
//! │  │                 │   Warning    │  badge:       │   badge:            │
//! │  │                 │              │  Critical     │   LimitReached      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A balance of exactly 100,000 is allowed; only going past it is blocked.
//! Nothing here blocks a sale by itself: the checkout policy decides whether
//! `can_proceed == false` stops the commit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Ceiling on a customer's outstanding balance (Rs. 100,000).
pub const MAX_CREDIT_LIMIT: Money = Money::from_major(100_000);

/// Balance at which the soft warning starts (90% of the limit).
pub const CREDIT_WARNING_THRESHOLD: Money = Money::from_major(90_000);

/// Outcome of [`check_credit_limit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreditCheck {
    pub can_proceed: bool,

    /// Empty when the purchase is comfortably within the limit.
    pub message: String,

    pub new_balance: Money,
}

impl CreditCheck {
    /// True when the purchase is allowed but close to the limit.
    pub fn is_warning(&self) -> bool {
        self.can_proceed && !self.message.is_empty()
    }
}

/// Checks a credit purchase against [`MAX_CREDIT_LIMIT`].
///
/// ## Example
/// ```rust
/// use bazaar_core::credit::check_credit_limit;
/// use bazaar_core::Money;
///
/// let check = check_credit_limit(Money::from_major(95_000), Money::from_major(10_000));
/// assert!(!check.can_proceed);
/// assert_eq!(check.new_balance, Money::from_major(105_000));
/// ```
pub fn check_credit_limit(current_balance: Money, new_purchase_amount: Money) -> CreditCheck {
    let new_balance = current_balance + new_purchase_amount;

    if new_balance > MAX_CREDIT_LIMIT {
        let exceeded_by = new_balance - MAX_CREDIT_LIMIT;
        return CreditCheck {
            can_proceed: false,
            message: format!(
                "Credit limit exceeded by {}. Current balance: {}, purchase amount: {}",
                exceeded_by, current_balance, new_purchase_amount
            ),
            new_balance,
        };
    }

    if new_balance >= CREDIT_WARNING_THRESHOLD {
        return CreditCheck {
            can_proceed: true,
            message: format!(
                "Customer is approaching the credit limit. Remaining credit: {}",
                remaining_credit(new_balance)
            ),
            new_balance,
        };
    }

    CreditCheck {
        can_proceed: true,
        message: String::new(),
        new_balance,
    }
}

/// Credit still available: `max(0, limit - balance)`.
pub fn remaining_credit(balance: Money) -> Money {
    (MAX_CREDIT_LIMIT - balance).non_negative()
}

/// Severity of a credit badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CreditWarningLevel {
    /// 75% or more of the limit used.
    Warning,
    /// 90% or more.
    Critical,
    /// Limit fully used.
    LimitReached,
}

/// Badge shown next to a customer with a large balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreditWarning {
    pub level: CreditWarningLevel,
    pub message: String,
}

/// Returns the tiered badge for a balance, or `None` below 75% usage.
pub fn credit_limit_warning(balance: Money) -> Option<CreditWarning> {
    let limit = MAX_CREDIT_LIMIT.minor() as i128;
    // basis points of the limit in use
    let usage_bps = balance.minor() as i128 * 10_000 / limit;

    let (level, message) = if usage_bps >= 10_000 {
        (CreditWarningLevel::LimitReached, "Credit limit reached".to_string())
    } else if usage_bps >= 9_000 {
        (
            CreditWarningLevel::Critical,
            format!("Critical: 90% of credit limit used ({} left)", remaining_credit(balance)),
        )
    } else if usage_bps >= 7_500 {
        (
            CreditWarningLevel::Warning,
            format!("Warning: 75% of credit limit used ({} left)", remaining_credit(balance)),
        )
    } else {
        return None;
    };

    Some(CreditWarning { level, message })
}

// =============================================================================
// Unit Tests
// =============================================================================
