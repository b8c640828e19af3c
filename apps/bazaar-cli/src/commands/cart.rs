//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│   Sale   │       │
//! │  │  Cart    │     │          │     │          │     │ committed│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           update_cart_item                        │             │
//! │       │           set_line_discount                       │             │
//! │       │           set_pricing                             │             │
//! │       │           remove_from_cart                        │             │
//! │       │                │                                  │             │
//! │       └──── clear_cart ┘◄─────────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::cart::Pricing;
use bazaar_core::validation::validate_rate_bps;
use bazaar_core::{DiscountRate, Money, TaxRate};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, CartResponse};

/// Gets the current cart contents and totals.
pub fn get_cart(state: &AppState) -> CartResponse {
    debug!("get_cart command");
    state.cart.snapshot()
}

/// Adds a product (by id or SKU) to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - If product not in cart: added as new line with a snapshot of the product
/// - Stock is checked against the current catalog
pub async fn add_to_cart(state: &AppState, key: &str, quantity: i64) -> Result<CartResponse, ApiError> {
    debug!(key = %key, quantity, "add_to_cart command");

    let pos = state.pos.read().await;
    let product = pos.product(key)?;
    let allow_negative = pos.policy().allow_negative_stock;

    state
        .cart
        .with_cart_mut(|cart| cart.add_item(product, quantity, allow_negative))?;
    Ok(state.cart.snapshot())
}

/// Sets a line's quantity. Zero removes the line; stock is checked against
/// the current catalog.
pub async fn update_cart_item(
    state: &AppState,
    key: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(key = %key, quantity, "update_cart_item command");

    let pos = state.pos.read().await;
    let product = pos.product(key)?;
    let allow_negative = pos.policy().allow_negative_stock;

    state
        .cart
        .with_cart_mut(|cart| cart.update_quantity(product, quantity, allow_negative))?;
    Ok(state.cart.snapshot())
}

/// Sets an absolute discount on one line.
pub async fn set_line_discount(
    state: &AppState,
    key: &str,
    discount: Money,
) -> Result<CartResponse, ApiError> {
    debug!(key = %key, %discount, "set_line_discount command");

    let id = state.pos.read().await.product(key)?.id.clone();
    state
        .cart
        .with_cart_mut(|cart| cart.set_discount(&id, discount))?;
    Ok(state.cart.snapshot())
}

pub async fn remove_from_cart(state: &AppState, key: &str) -> Result<CartResponse, ApiError> {
    debug!(key = %key, "remove_from_cart command");

    let id = state.pos.read().await.product(key)?.id.clone();
    state.cart.with_cart_mut(|cart| cart.remove_item(&id))?;
    Ok(state.cart.snapshot())
}

pub fn clear_cart(state: &AppState) -> CartResponse {
    debug!("clear_cart command");
    state.cart.with_cart_mut(|cart| cart.clear());
    state.cart.snapshot()
}

/// Sets the bill-wide discount and tax rate, in basis points.
pub fn set_pricing(state: &AppState, discount_bps: u32, tax_bps: u32) -> Result<CartResponse, ApiError> {
    debug!(discount_bps, tax_bps, "set_pricing command");

    validate_rate_bps("discount rate", discount_bps)?;
    validate_rate_bps("tax rate", tax_bps)?;
    state.cart.set_pricing(Pricing::new(
        DiscountRate::from_bps(discount_bps),
        TaxRate::from_bps(tax_bps),
    ));
    Ok(state.cart.snapshot())
}
