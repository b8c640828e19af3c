//! # Checkout
//!
//! Turns a cart into a [`Sale`] and works out every side effect the commit
//! has to apply. Nothing is mutated here: the caller receives a
//! [`SaleDraft`] and applies its stock decrements and customer update
//! through its normal update paths.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart lines + pricing + customer + payment mode                         │
//! │       │                                                                 │
//! │       ├── empty cart? ─────────────────────────► EmptyCart             │
//! │       ├── credit without customer? ────────────► CreditRequiresCustomer│
//! │       ├── live stock short? (strict) ──────────► InsufficientStock     │
//! │       ├── credit over limit? (strict) ─────────► CreditLimitExceeded   │
//! │       ▼                                                                 │
//! │  CartTotals::compute ──► invoice number ──► loyalty points             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft { sale, stock_decrements, customer_update, credit_check }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{CartTotals, Pricing};
use crate::credit::{check_credit_limit, CreditCheck};
use crate::error::{CoreError, CoreResult};
use crate::loyalty::calculate_loyalty_points;
use crate::money::Money;
use crate::types::{new_id, CartItem, Customer, Employee, PaymentMode, Product, Sale, SaleStatus};

// =============================================================================
// Policy
// =============================================================================

/// Which business rules checkout enforces.
///
/// `strict()` closes the gaps of the browser demo this system replaces;
/// `permissive()` reproduces it exactly: no credit blocking, no loyalty
/// accrual, stock allowed to go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutPolicy {
    /// Block credit sales that would exceed the credit limit.
    pub enforce_credit_limit: bool,

    /// Credit loyalty points to the customer on commit.
    pub award_loyalty_points: bool,

    /// Let a sale take stock below zero.
    pub allow_negative_stock: bool,
}

impl CheckoutPolicy {
    pub const fn strict() -> Self {
        CheckoutPolicy {
            enforce_credit_limit: true,
            award_loyalty_points: true,
            allow_negative_stock: false,
        }
    }

    pub const fn permissive() -> Self {
        CheckoutPolicy {
            enforce_credit_limit: false,
            award_loyalty_points: false,
            allow_negative_stock: true,
        }
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy::strict()
    }
}

// =============================================================================
// Invoice Numbering
// =============================================================================

/// Monotonic invoice counter.
///
/// Numbers never repeat, even if sales are later deleted or filtered out of
/// the collection. Seed it from existing sales once, then persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSequence {
    last_issued: u32,
}

impl InvoiceSequence {
    pub const fn starting_after(last_issued: u32) -> Self {
        InvoiceSequence { last_issued }
    }

    /// Seeds the counter past every sale already on record.
    ///
    /// Takes the larger of the sale count and the highest parsed sequence,
    /// so data numbered by array length continues without a collision.
    pub fn seeded_from(sales: &[Sale]) -> Self {
        let highest = sales
            .iter()
            .filter_map(|s| parse_invoice_number(&s.invoice_number))
            .map(|(_, seq)| seq)
            .max()
            .unwrap_or(0);
        let count = u32::try_from(sales.len()).unwrap_or(u32::MAX);
        InvoiceSequence {
            last_issued: highest.max(count),
        }
    }

    pub const fn last_issued(&self) -> u32 {
        self.last_issued
    }

    /// The number the next commit will use. Does not advance.
    pub fn peek(&self, year: i32) -> String {
        format_invoice_number(year, self.last_issued.saturating_add(1))
    }

    /// Marks the peeked number as used.
    pub fn advance(&mut self) -> u32 {
        self.last_issued = self.last_issued.saturating_add(1);
        self.last_issued
    }
}

/// `INV-{year}-{sequence}` with the sequence zero-padded to four digits.
pub fn format_invoice_number(year: i32, sequence: u32) -> String {
    format!("INV-{}-{:04}", year, sequence)
}

/// Parses `INV-2026-0042` into `(2026, 42)`.
pub fn parse_invoice_number(invoice: &str) -> Option<(i32, u32)> {
    let rest = invoice.strip_prefix("INV-")?;
    let (year, seq) = rest.split_once('-')?;
    Some((year.parse().ok()?, seq.parse().ok()?))
}

// =============================================================================
// Draft
// =============================================================================

/// Who is buying, who is selling, and how it is paid.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutRequest<'a> {
    pub payment_mode: PaymentMode,
    /// `None` for a walk-in sale.
    pub customer: Option<&'a Customer>,
    pub cashier: &'a Employee,
}

/// Stock to take off one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDecrement {
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    /// Stock after the decrement is applied.
    pub remaining: i64,
}

/// Changes to the buying customer's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub customer_id: String,
    /// Added to the outstanding balance (credit sales only).
    pub balance_increase: Money,
    pub points_awarded: i64,
    pub purchased_at: DateTime<Utc>,
}

/// Everything a commit needs to apply.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub sale: Sale,
    pub totals: CartTotals,
    pub stock_decrements: Vec<StockDecrement>,
    pub customer_update: Option<CustomerUpdate>,
    /// Present for credit sales; carries the soft warning if any.
    pub credit_check: Option<CreditCheck>,
}

/// Builds the sale for a cart.
///
/// `catalog` is the live product list: stock is checked against it, not
/// against the (possibly stale) snapshots inside the cart.
pub fn prepare_sale(
    items: &[CartItem],
    catalog: &[Product],
    pricing: Pricing,
    request: CheckoutRequest<'_>,
    policy: CheckoutPolicy,
    invoice_number: String,
    now: DateTime<Utc>,
) -> CoreResult<SaleDraft> {
    if items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    if request.payment_mode == PaymentMode::Credit && request.customer.is_none() {
        return Err(CoreError::CreditRequiresCustomer);
    }

    // One entry per product, in cart order; lines for the same product add up.
    let mut requested: Vec<(&str, i64)> = Vec::with_capacity(items.len());
    for item in items {
        match requested.iter_mut().find(|(id, _)| *id == item.product.id) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => requested.push((item.product.id.as_str(), item.quantity)),
        }
    }

    let stock_decrements = requested
        .into_iter()
        .map(|(product_id, quantity)| {
            let live = catalog
                .iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

            if !policy.allow_negative_stock && !live.has_stock_for(quantity) {
                return Err(CoreError::InsufficientStock {
                    sku: live.sku.clone(),
                    available: live.quantity,
                    requested: quantity,
                });
            }

            Ok(StockDecrement {
                product_id: live.id.clone(),
                sku: live.sku.clone(),
                quantity,
                remaining: live.quantity - quantity,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let totals = CartTotals::compute(items, pricing);

    let credit_check = match (request.payment_mode, request.customer) {
        (PaymentMode::Credit, Some(customer)) => {
            let check = check_credit_limit(customer.outstanding_balance, totals.total);
            if policy.enforce_credit_limit && !check.can_proceed {
                return Err(CoreError::CreditLimitExceeded {
                    customer_id: customer.id.clone(),
                    message: check.message,
                });
            }
            Some(check)
        }
        _ => None,
    };

    let points_awarded = match request.customer {
        Some(_) if policy.award_loyalty_points => calculate_loyalty_points(totals.total),
        _ => 0,
    };

    let customer_update = request.customer.map(|customer| CustomerUpdate {
        customer_id: customer.id.clone(),
        balance_increase: if request.payment_mode == PaymentMode::Credit {
            totals.total
        } else {
            Money::zero()
        },
        points_awarded,
        purchased_at: now,
    });

    let sale = Sale {
        id: new_id(),
        invoice_number,
        customer_id: request.customer.map(|c| c.id.clone()),
        customer_name: request.customer.map(|c| c.name.clone()),
        items: items.to_vec(),
        subtotal: totals.subtotal,
        discount: totals.discount,
        tax: totals.tax,
        total: totals.total,
        payment_mode: request.payment_mode,
        cashier_id: request.cashier.id.clone(),
        cashier_name: request.cashier.name.clone(),
        date: now,
        status: SaleStatus::Completed,
        loyalty_points_awarded: points_awarded,
    };

    Ok(SaleDraft {
        sale,
        totals,
        stock_decrements,
        customer_update,
        credit_check,
    })
}

/// Next invoice number, numbered in the year `now` falls in on the
/// store's calendar (pass `now` already converted to the store's zone).
pub fn next_invoice_number<Tz: TimeZone>(sequence: &InvoiceSequence, now: DateTime<Tz>) -> String {
    sequence.peek(now.year())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscountRate, Role, TaxRate};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 30, 0).unwrap()
    }

    fn pricing() -> Pricing {
        Pricing::new(DiscountRate::from_bps(1000), TaxRate::from_bps(1800))
    }

    fn tea(stock: i64) -> Product {
        Product::new("TEA", "Tea 250g", Money::from_major(250), stock)
    }

    fn cashier() -> Employee {
        Employee::new("Ravi", Role::Cashier)
    }

    fn request<'a>(
        mode: PaymentMode,
        customer: Option<&'a Customer>,
        cashier: &'a Employee,
    ) -> CheckoutRequest<'a> {
        CheckoutRequest {
            payment_mode: mode,
            customer,
            cashier,
        }
    }

    #[test]
    fn test_walk_in_cash_sale() {
        let product = tea(10);
        let items = vec![CartItem::new(product.clone(), 2)];
        let cashier = cashier();

        let draft = prepare_sale(
            &items,
            &[product],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        )
        .unwrap();

        assert!(draft.sale.is_walk_in());
        assert_eq!(draft.sale.customer_label(), "Walk-in Customer");
        assert_eq!(draft.sale.total, Money::from_major(531));
        assert_eq!(draft.sale.total, draft.totals.taxable + draft.sale.tax);
        assert_eq!(draft.stock_decrements[0].remaining, 8);
        assert!(draft.customer_update.is_none());
        assert!(draft.credit_check.is_none());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let cashier = cashier();
        let result = prepare_sale(
            &[],
            &[],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        );
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_credit_requires_customer() {
        let product = tea(10);
        let items = vec![CartItem::new(product.clone(), 1)];
        let cashier = cashier();

        let result = prepare_sale(
            &items,
            &[product],
            pricing(),
            request(PaymentMode::Credit, None, &cashier),
            CheckoutPolicy::permissive(),
            "INV-2026-0001".to_string(),
            now(),
        );
        assert!(matches!(result, Err(CoreError::CreditRequiresCustomer)));
    }

    #[test]
    fn test_stock_checked_against_live_catalog() {
        let snapshot = tea(10);
        let mut live = snapshot.clone();
        live.quantity = 1;
        let items = vec![CartItem::new(snapshot, 2)];
        let cashier = cashier();

        let strict = prepare_sale(
            &items,
            &[live.clone()],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        );
        assert!(matches!(strict, Err(CoreError::InsufficientStock { available: 1, .. })));

        let permissive = prepare_sale(
            &items,
            &[live],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::permissive(),
            "INV-2026-0001".to_string(),
            now(),
        )
        .unwrap();
        assert_eq!(permissive.stock_decrements[0].remaining, -1);
    }

    #[test]
    fn test_lines_for_same_product_share_stock() {
        let product = tea(3);
        let items = vec![CartItem::new(product.clone(), 2), CartItem::new(product.clone(), 2)];
        let cashier = cashier();

        let strict = prepare_sale(
            &items,
            &[product.clone()],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        );
        assert!(matches!(
            strict,
            Err(CoreError::InsufficientStock { available: 3, requested: 4, .. })
        ));

        let permissive = prepare_sale(
            &items,
            &[product],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::permissive(),
            "INV-2026-0001".to_string(),
            now(),
        )
        .unwrap();
        assert_eq!(permissive.stock_decrements.len(), 1);
        assert_eq!(permissive.stock_decrements[0].quantity, 4);
        assert_eq!(permissive.stock_decrements[0].remaining, -1);
        assert_eq!(permissive.sale.items.len(), 2);
    }

    #[test]
    fn test_credit_limit_enforced_only_when_strict() {
        let product = Product::new("TV", "Television", Money::from_major(10_000), 5);
        let items = vec![CartItem::new(product.clone(), 1)];
        let mut customer = Customer::new("Meena", "9800000000");
        customer.outstanding_balance = Money::from_major(95_000);
        let cashier = cashier();
        let no_tax = Pricing::default();

        let strict = prepare_sale(
            &items,
            &[product.clone()],
            no_tax,
            request(PaymentMode::Credit, Some(&customer), &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        );
        match strict {
            Err(CoreError::CreditLimitExceeded { message, .. }) => {
                assert!(message.contains("Rs. 5,000.00"))
            }
            other => panic!("expected credit limit error, got {:?}", other),
        }

        let permissive = prepare_sale(
            &items,
            &[product],
            no_tax,
            request(PaymentMode::Credit, Some(&customer), &cashier),
            CheckoutPolicy::permissive(),
            "INV-2026-0001".to_string(),
            now(),
        )
        .unwrap();
        let check = permissive.credit_check.unwrap();
        assert!(!check.can_proceed);
        let update = permissive.customer_update.unwrap();
        assert_eq!(update.balance_increase, Money::from_major(10_000));
        assert_eq!(update.points_awarded, 0);
    }

    #[test]
    fn test_loyalty_awarded_to_registered_customer() {
        let product = tea(10);
        let items = vec![CartItem::new(product.clone(), 2)];
        let customer = Customer::new("Meena", "9800000000");
        let cashier = cashier();

        let draft = prepare_sale(
            &items,
            &[product],
            pricing(),
            request(PaymentMode::Upi, Some(&customer), &cashier),
            CheckoutPolicy::strict(),
            "INV-2026-0001".to_string(),
            now(),
        )
        .unwrap();

        // Rs. 531 → 5 points
        assert_eq!(draft.sale.loyalty_points_awarded, 5);
        let update = draft.customer_update.unwrap();
        assert_eq!(update.points_awarded, 5);
        assert_eq!(update.balance_increase, Money::zero());
        assert_eq!(update.purchased_at, now());
    }

    #[test]
    fn test_invoice_sequence_is_monotonic() {
        let mut seq = InvoiceSequence::default();
        assert_eq!(seq.peek(2026), "INV-2026-0001");
        assert_eq!(seq.peek(2026), "INV-2026-0001");
        seq.advance();
        assert_eq!(seq.peek(2026), "INV-2026-0002");
    }

    #[test]
    fn test_invoice_sequence_seeded_past_gaps() {
        let product = tea(10);
        let items = vec![CartItem::new(product.clone(), 1)];
        let cashier = cashier();
        let mut sale = prepare_sale(
            &items,
            &[product],
            pricing(),
            request(PaymentMode::Cash, None, &cashier),
            CheckoutPolicy::strict(),
            "INV-2025-0007".to_string(),
            now(),
        )
        .unwrap()
        .sale;

        // one surviving sale numbered 7: length-based numbering would reuse 2
        let seq = InvoiceSequence::seeded_from(std::slice::from_ref(&sale));
        assert_eq!(seq.peek(2026), "INV-2026-0008");

        sale.invoice_number = "legacy".to_string();
        let seq = InvoiceSequence::seeded_from(&[sale.clone(), sale]);
        assert_eq!(seq.last_issued(), 2);
    }

    #[test]
    fn test_parse_invoice_number() {
        assert_eq!(parse_invoice_number("INV-2026-0042"), Some((2026, 42)));
        assert_eq!(parse_invoice_number("INV-2026-12345"), Some((2026, 12345)));
        assert_eq!(parse_invoice_number("RCP-2026-0042"), None);
        assert_eq!(parse_invoice_number("INV-20x6-0042"), None);
    }

    #[test]
    fn test_next_invoice_number_uses_commit_year() {
        let seq = InvoiceSequence::starting_after(41);
        assert_eq!(next_invoice_number(&seq, now()), "INV-2026-0042");
    }

    #[test]
    fn test_next_invoice_number_follows_store_year() {
        let seq = InvoiceSequence::starting_after(41);
        // 20:00 UTC on New Year's Eve is already 1 January in India
        let eve = Utc.with_ymd_and_hms(2026, 12, 31, 20, 0, 0).unwrap();
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();

        assert_eq!(next_invoice_number(&seq, eve), "INV-2026-0042");
        assert_eq!(next_invoice_number(&seq, eve.with_timezone(&ist)), "INV-2027-0042");
    }
}
