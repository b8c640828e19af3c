//! # Cart State
//!
//! The billing cart shared between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  commands::cart::add_to_cart ───┐                                       │
//! │  commands::cart::set_discount ──┼──► CartState { Arc<Mutex<Counter>> }  │
//! │  commands::sale::checkout ──────┘          │                            │
//! │                                            ▼                            │
//! │                                  bazaar_core::cart::Cart                │
//! │                                  (merge, stock guard, discounts)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is a std `Mutex`: no closure passed to it ever awaits.

use std::sync::{Arc, Mutex, MutexGuard};

use bazaar_core::cart::{Cart, CartTotals, Pricing};
use bazaar_core::CartItem;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct CartState {
    counter: Arc<Mutex<Counter>>,
}

/// The cart plus the bill-level rates entered at the counter.
#[derive(Debug, Default)]
struct Counter {
    cart: Cart,
    pricing: Pricing,
}

impl CartState {
    /// Empty cart billed at `pricing` until changed.
    pub fn new(pricing: Pricing) -> Self {
        CartState {
            counter: Arc::new(Mutex::new(Counter {
                cart: Cart::new(),
                pricing,
            })),
        }
    }

    /// Runs `f` with shared access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock().cart)
    }

    /// Runs `f` with exclusive access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock().cart)
    }

    pub fn pricing(&self) -> Pricing {
        self.lock().pricing
    }

    /// Changes the global discount and tax rate. Lines are untouched.
    pub fn set_pricing(&self, pricing: Pricing) {
        self.lock().pricing = pricing;
    }

    /// Cart lines plus the bill at the current rates.
    pub fn snapshot(&self) -> CartResponse {
        let counter = self.lock();
        CartResponse {
            items: counter.cart.items.clone(),
            totals: counter.cart.totals(counter.pricing),
            pricing: counter.pricing,
        }
    }

    // A panic while holding the lock leaves a cart that is still
    // structurally valid, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Counter> {
        self.counter.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cart lines plus totals, as returned by every cart command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    pub pricing: Pricing,
}
