//! # Domain Types
//!
//! Core domain types used throughout Bazaar POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Employee     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  outstanding    │   │  role           │       │
//! │  │  selling_price  │   │  loyalty_points │   │  attendance     │       │
//! │  │  quantity       │   │                 │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │      Sale       │   │  PaymentMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product (snap) │──►│  invoice_number │   │  Cash / Card    │       │
//! │  │  quantity       │   │  items (frozen) │   │  Upi / Credit   │       │
//! │  │  discount       │   │  totals         │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for references between collections
//! - Business ID: (sku, invoice_number, phone) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

/// Generates a new entity ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Rates
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

/// Global cart discount in basis points (1000 = 10%).
///
/// Distinct from the absolute per-line discount on a [`CartItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on the invoice.
    pub name: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub category: String,

    pub brand: String,

    /// What the store paid per unit.
    pub purchase_price: Money,

    /// Shelf price per unit.
    pub selling_price: Money,

    /// Current stock. Only completed sales and manual edits change it.
    pub quantity: i64,

    /// Stock at or below this level is flagged low.
    pub reorder_level: i64,

    pub supplier: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product with a fresh ID and empty catalog metadata.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, selling_price: Money, quantity: i64) -> Self {
        let now = Utc::now();
        Product {
            id: new_id(),
            name: name.into(),
            sku: sku.into(),
            category: String::new(),
            brand: String::new(),
            purchase_price: Money::zero(),
            selling_price,
            quantity,
            reorder_level: 0,
            supplier: String::new(),
            barcode: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if the product should be reordered.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Per-unit margin (selling minus purchase price).
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.selling_price - self.purchase_price
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. Sales without one are walk-in sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,

    /// Credit owed by the customer.
    pub outstanding_balance: Money,

    /// Accumulated loyalty points.
    pub loyalty_points: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub last_purchase: Option<DateTime<Utc>>,
}

impl Customer {
    /// Creates a customer with no balance and no points.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Customer {
            id: new_id(),
            name: name.into(),
            phone: phone.into(),
            email: None,
            address: None,
            outstanding_balance: Money::zero(),
            loyalty_points: 0,
            created_at: Utc::now(),
            last_purchase: None,
        }
    }
}

// =============================================================================
// Employee
// =============================================================================

/// Staff role. Drives the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Manager,
    Cashier,
}

/// Denormalized "today" status kept on the employee record.
///
/// The full calendar lives in the attendance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EmployeeStatus {
    #[default]
    Present,
    Absent,
    Leave,
}

impl std::str::FromStr for Role {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "manager".to_string(), "cashier".to_string()],
            }),
        }
    }
}

impl std::str::FromStr for EmployeeStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(EmployeeStatus::Present),
            "absent" => Ok(EmployeeStatus::Absent),
            "leave" | "on leave" => Ok(EmployeeStatus::Leave),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "employee status".to_string(),
                allowed: vec!["present".to_string(), "absent".to_string(), "leave".to_string()],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub email: String,
    pub salary: Money,

    #[ts(as = "String")]
    pub joining_date: NaiveDate,

    pub is_active: bool,
    pub attendance_status: EmployeeStatus,
}

impl Employee {
    /// Creates an active employee who joined today.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Employee {
            id: new_id(),
            name: name.into(),
            role,
            phone: String::new(),
            email: String::new(),
            salary: Money::zero(),
            joining_date: Utc::now().date_naive(),
            is_active: true,
            attendance_status: EmployeeStatus::default(),
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the billing cart.
///
/// Embeds a full product snapshot, not a reference: the line keeps the price
/// it was rung up at even if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,

    /// Absolute amount off this line.
    pub discount: Money,
}

impl CartItem {
    pub fn new(product: Product, quantity: i64) -> Self {
        CartItem {
            product,
            quantity,
            discount: Money::zero(),
        }
    }

    /// Unit price × quantity, before the line discount.
    #[inline]
    pub fn gross_amount(&self) -> Money {
        self.product.selling_price.multiply_quantity(self.quantity)
    }

    /// Line amount after the line discount.
    #[inline]
    pub fn line_amount(&self) -> Money {
        self.gross_amount() - self.discount
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMode {
    Cash,
    Card,
    Upi,
    /// Added to the customer's outstanding balance.
    Credit,
}

impl std::str::FromStr for PaymentMode {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMode::Cash),
            "card" => Ok(PaymentMode::Card),
            "upi" => Ok(PaymentMode::Upi),
            "credit" => Ok(PaymentMode::Credit),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "payment mode".to_string(),
                allowed: vec![
                    "cash".to_string(),
                    "card".to_string(),
                    "upi".to_string(),
                    "credit".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SaleStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

impl SaleStatus {
    /// Allowed moves: pending → completed | cancelled, completed → cancelled.
    /// Cancelled is terminal.
    pub fn can_transition_to(self, next: SaleStatus) -> bool {
        matches!(
            (self, next),
            (SaleStatus::Pending, SaleStatus::Completed)
                | (SaleStatus::Pending, SaleStatus::Cancelled)
                | (SaleStatus::Completed, SaleStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Pending => "pending",
            SaleStatus::Cancelled => "cancelled",
        })
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(SaleStatus::Completed),
            "pending" => Ok(SaleStatus::Pending),
            "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "sale status".to_string(),
                allowed: vec![
                    "completed".to_string(),
                    "pending".to_string(),
                    "cancelled".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Items are frozen at checkout; only status changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// `INV-{year}-{sequence:04}`.
    pub invoice_number: String,

    /// `None` for walk-in customers.
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,

    pub items: Vec<CartItem>,

    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,

    pub payment_mode: PaymentMode,
    pub cashier_id: String,
    pub cashier_name: String,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub status: SaleStatus,

    /// Points credited to the customer for this sale.
    #[serde(default)]
    pub loyalty_points_awarded: i64,
}

impl Sale {
    /// Returns true when no customer is attached.
    #[inline]
    pub fn is_walk_in(&self) -> bool {
        self.customer_id.is_none()
    }

    /// Total units across all lines.
    pub fn units_sold(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Customer label for invoices and reports.
    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or("Walk-in Customer")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(18.0);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1250);
        assert_eq!(DiscountRate::from_percentage(-3.0).bps(), 0);
    }

    #[test]
    fn test_low_stock() {
        let mut product = Product::new("RICE-5KG", "Basmati Rice 5kg", Money::from_major(650), 4);
        product.reorder_level = 5;
        assert!(product.is_low_stock());

        product.quantity = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_cart_item_line_amount() {
        let product = Product::new("TEA-250", "Tea 250g", Money::from_major(250), 10);
        let mut item = CartItem::new(product, 2);
        item.discount = Money::from_major(20);
        assert_eq!(item.gross_amount(), Money::from_major(500));
        assert_eq!(item.line_amount(), Money::from_major(480));
    }

    #[test]
    fn test_payment_mode_parse() {
        assert_eq!("UPI".parse::<PaymentMode>().unwrap(), PaymentMode::Upi);
        assert_eq!(" credit ".parse::<PaymentMode>().unwrap(), PaymentMode::Credit);
        assert!("cheque".parse::<PaymentMode>().is_err());
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::new("SOAP-1", "Soap", Money::from_major(40), 3);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["sellingPrice"], 4000);
        assert_eq!(json["reorderLevel"], 0);
    }

    #[test]
    fn test_sale_status_transitions() {
        use SaleStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("on leave".parse::<EmployeeStatus>().unwrap(), EmployeeStatus::Leave);
        assert!("owner".parse::<Role>().is_err());
    }
}
