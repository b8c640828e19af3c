//! # Billing Cart
//!
//! The cart being rung up at the counter, and the arithmetic that turns it
//! into a bill.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Click Product ──────────► add_item() ─────────► push / merge line     │
//! │  Change Quantity ────────► update_quantity() ──► qty = n (0 removes)   │
//! │  Line Discount ──────────► set_discount() ─────► discount = Rs. x      │
//! │  Click Remove ───────────► remove_item() ──────► line removed          │
//! │  Checkout / Clear ───────► clear() ────────────► items emptied         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bill Arithmetic
//! ```text
//! subtotal  = Σ (selling_price × qty − line discount)
//! discount  = subtotal × global discount %
//! taxable   = subtotal − discount
//! tax       = taxable × tax rate %
//! total     = taxable + tax
//! ```
//! Each step rounds to whole paise, so `total == taxable + tax` holds exactly
//! and matches the two-decimal figures on screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, DiscountRate, Product, TaxRate};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Pricing
// =============================================================================

/// Bill-level rates entered at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pricing {
    /// Global discount applied to the whole subtotal.
    pub discount_rate: DiscountRate,
    pub tax_rate: TaxRate,
}

impl Pricing {
    pub const fn new(discount_rate: DiscountRate, tax_rate: TaxRate) -> Self {
        Pricing {
            discount_rate,
            tax_rate,
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Bill summary for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub taxable: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// Computes the bill for `items` under `pricing`.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::cart::{CartTotals, Pricing};
    /// use bazaar_core::{CartItem, DiscountRate, Money, Product, TaxRate};
    ///
    /// let product = Product::new("TEA-250", "Tea 250g", Money::from_major(250), 10);
    /// let items = vec![CartItem::new(product, 2)];
    /// let pricing = Pricing::new(DiscountRate::from_bps(1000), TaxRate::from_bps(1800));
    ///
    /// let totals = CartTotals::compute(&items, pricing);
    /// assert_eq!(totals.subtotal, Money::from_major(500));
    /// assert_eq!(totals.discount, Money::from_major(50));
    /// assert_eq!(totals.tax, Money::from_major(81));
    /// assert_eq!(totals.total, Money::from_major(531));
    /// ```
    pub fn compute(items: &[CartItem], pricing: Pricing) -> Self {
        let subtotal: Money = items.iter().map(CartItem::line_amount).sum();
        let discount = subtotal.calculate_discount(pricing.discount_rate);
        let taxable = subtotal - discount;
        let tax = taxable.calculate_tax(pricing.tax_rate);

        CartTotals {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| i.quantity).sum(),
            subtotal,
            discount,
            taxable,
            tax,
            total: taxable + tax,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product merges)
/// - Quantity is > 0 (setting 0 removes the line)
/// - Quantity never exceeds the snapshot stock unless negative stock is allowed
/// - A line discount never exceeds the line's gross amount
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product or increases the quantity of an existing line.
    ///
    /// The line keeps its original snapshot; the stock check uses the
    /// product passed in, which is the freshest view of the catalog.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        allow_negative_stock: bool,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let new_qty = item.quantity + quantity;
            check_quantity(product, new_qty, allow_negative_stock)?;
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        check_quantity(product, quantity, allow_negative_stock)?;
        self.items.push(CartItem::new(product.clone(), quantity));
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// As with [`Cart::add_item`], stock is checked against `product` (the
    /// live catalog entry), not the line's snapshot. A line discount larger
    /// than the new gross amount is cut down to it.
    pub fn update_quantity(
        &mut self,
        product: &Product,
        quantity: i64,
        allow_negative_stock: bool,
    ) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(&product.id);
        }
        validate_quantity(quantity)?;

        let item = self.find_mut(&product.id)?;
        check_quantity(product, quantity, allow_negative_stock)?;
        item.quantity = quantity;
        if item.discount > item.gross_amount() {
            item.discount = item.gross_amount();
        }
        Ok(())
    }

    /// Sets the absolute discount on one line.
    pub fn set_discount(&mut self, product_id: &str, discount: Money) -> CoreResult<()> {
        let item = self.find_mut(product_id)?;

        if discount.is_negative() || discount > item.gross_amount() {
            return Err(CoreError::DiscountExceedsLine {
                sku: item.product.sku.clone(),
                discount,
                line_amount: item.gross_amount(),
            });
        }

        item.discount = discount;
        Ok(())
    }

    /// Removes a line by product id.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bill summary for the current lines.
    pub fn totals(&self, pricing: Pricing) -> CartTotals {
        CartTotals::compute(&self.items, pricing)
    }

    fn find_mut(&mut self, product_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))
    }
}

fn check_quantity(product: &Product, quantity: i64, allow_negative_stock: bool) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    if !allow_negative_stock && !product.has_stock_for(quantity) {
        return Err(CoreError::InsufficientStock {
            sku: product.sku.clone(),
            available: product.quantity,
            requested: quantity,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sku: &str, price: i64, stock: i64) -> Product {
        Product::new(sku, format!("Product {}", sku), Money::from_major(price), stock)
    }

    fn gst_pricing() -> Pricing {
        Pricing::new(DiscountRate::from_bps(1000), TaxRate::from_bps(1800))
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);

        cart.add_item(&tea, 2, false).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);

        cart.add_item(&tea, 2, false).unwrap();
        cart.add_item(&tea, 3, false).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_rejects_more_than_stock() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 3);

        cart.add_item(&tea, 2, false).unwrap();
        let err = cart.add_item(&tea, 2, false).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            }
        ));

        // permissive mode lets the line go past stock
        cart.add_item(&tea, 2, true).unwrap();
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);
        cart.add_item(&tea, 2, false).unwrap();

        cart.update_quantity(&tea, 0, false).unwrap();
        assert!(cart.is_empty());
        assert!(matches!(
            cart.update_quantity(&tea, 1, false),
            Err(CoreError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_update_quantity_trims_discount() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);
        cart.add_item(&tea, 2, false).unwrap();
        cart.set_discount(&tea.id, Money::from_major(400)).unwrap();

        cart.update_quantity(&tea, 1, false).unwrap();
        assert_eq!(cart.items[0].discount, Money::from_major(250));
    }

    #[test]
    fn test_update_quantity_checks_live_stock() {
        let mut cart = Cart::new();
        let snapshot = product("TEA", 250, 3);
        cart.add_item(&snapshot, 2, false).unwrap();

        let mut restocked = snapshot.clone();
        restocked.quantity = 20;
        cart.update_quantity(&restocked, 12, false).unwrap();
        assert_eq!(cart.total_quantity(), 12);

        let mut sold_out = snapshot;
        sold_out.quantity = 1;
        assert!(matches!(
            cart.update_quantity(&sold_out, 2, false),
            Err(CoreError::InsufficientStock { available: 1, requested: 2, .. })
        ));
        assert_eq!(cart.total_quantity(), 12);
    }

    #[test]
    fn test_discount_cannot_exceed_line() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);
        cart.add_item(&tea, 2, false).unwrap();

        assert!(cart.set_discount(&tea.id, Money::from_major(501)).is_err());
        assert!(cart.set_discount(&tea.id, Money::from_major(-1)).is_err());
        cart.set_discount(&tea.id, Money::from_major(500)).unwrap();
    }

    #[test]
    fn test_scenario_bill() {
        let mut cart = Cart::new();
        cart.add_item(&product("TEA", 250, 10), 2, false).unwrap();

        let totals = cart.totals(gst_pricing());
        assert_eq!(totals.subtotal, Money::from_major(500));
        assert_eq!(totals.discount, Money::from_major(50));
        assert_eq!(totals.taxable, Money::from_major(450));
        assert_eq!(totals.tax, Money::from_major(81));
        assert_eq!(totals.total, Money::from_major(531));
    }

    #[test]
    fn test_line_discount_applies_before_global_discount() {
        let mut cart = Cart::new();
        let tea = product("TEA", 250, 10);
        let sugar = product("SUGAR", 45, 10);
        cart.add_item(&tea, 2, false).unwrap();
        cart.add_item(&sugar, 3, false).unwrap();
        cart.set_discount(&tea.id, Money::from_major(35)).unwrap();

        // (500 - 35) + 135 = 600; 10% off = 60; 540 taxable; 18% = 97.20
        let totals = cart.totals(gst_pricing());
        assert_eq!(totals.subtotal, Money::from_major(600));
        assert_eq!(totals.tax, Money::from_minor(9_720));
        assert_eq!(totals.total, Money::from_minor(63_720));
        assert_eq!(totals.total, totals.taxable + totals.tax);
    }

    #[test]
    fn test_total_is_taxable_plus_tax_with_odd_amounts() {
        let mut cart = Cart::new();
        let odd = Product::new("ODD", "Odd", Money::from_minor(333), 100);
        cart.add_item(&odd, 7, false).unwrap();

        let pricing = Pricing::new(DiscountRate::from_bps(1250), TaxRate::from_bps(500));
        let totals = cart.totals(pricing);
        assert_eq!(totals.subtotal.minor(), 2331);
        // 12.5% of 2331 = 291.375 → 291
        assert_eq!(totals.discount.minor(), 291);
        assert_eq!(totals.taxable.minor(), 2040);
        assert_eq!(totals.tax.minor(), 102);
        assert_eq!(totals.total, totals.taxable + totals.tax);
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("TEA", 250, 10), 2, false).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
