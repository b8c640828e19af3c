//! # bazaar-core: Business Rules for Bazaar POS
//!
//! This crate holds every business rule of Bazaar POS as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bazaar (CLI)                                 │   │
//! │  │    attendance, credit-check, loyalty, low-stock, dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         Commands + PosState (in-memory collections)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  credit  │ │ loyalty  │ │   cart   │ │     checkout     │  │   │
//! │  │   │  limits  │ │  points  │ │  totals  │ │ Sale + invoice # │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │attendance│ │ summary  │ │permission│ │ money/validation │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS IN RULES               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bazaar-store (SQLite)                          │   │
//! │  │          key-value collections + attendance table               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Employee, Sale, ...)
//! - [`money`] - Money type with integer arithmetic in paise
//! - [`credit`] - Credit limit check and warning badges
//! - [`loyalty`] - Loyalty point accrual
//! - [`cart`] - Billing cart and totals
//! - [`checkout`] - Cart → Sale, invoice numbering
//! - [`attendance`] - Calendar ledger, monthly KPIs, CSV export
//! - [`permissions`] - Role → permission table
//! - [`summary`] - Dashboard figures
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::credit::check_credit_limit;
//! use bazaar_core::loyalty::calculate_loyalty_points;
//! use bazaar_core::Money;
//!
//! let check = check_credit_limit(Money::from_major(80_000), Money::from_major(12_000));
//! assert!(check.can_proceed);
//! assert!(check.is_warning());
//!
//! assert_eq!(calculate_loyalty_points(Money::from_major(250)), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attendance;
pub mod cart;
pub mod checkout;
pub mod credit;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod permissions;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
