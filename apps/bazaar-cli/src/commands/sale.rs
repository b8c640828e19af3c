//! # Sale Commands
//!
//! Checkout and sale history.
//!
//! ## Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(customer?, cashier, payment)                                  │
//! │       │                                                                 │
//! │       ├── cashier active, role has Billing? no ──► PERMISSION_DENIED    │
//! │       ├── snapshot cart lines + rates                                   │
//! │       ├── PosState::commit_sale()           err ──► cart kept as is     │
//! │       └── clear cart                                                    │
//! │                                                                         │
//! │  ◄── { sale: {...}, creditWarning: "Customer is approaching ..." }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::permissions::{has_permission, Permission};
use bazaar_core::{PaymentMode, Sale, SaleStatus};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::{AppState, CommittedSale};

/// Commits the current cart as a sale.
///
/// `customer` is an id or phone number; `None` makes a walk-in sale.
pub async fn checkout(
    state: &AppState,
    customer: Option<&str>,
    cashier_id: &str,
    payment_mode: PaymentMode,
    now: DateTime<Utc>,
) -> Result<CommittedSale, ApiError> {
    debug!(?customer, cashier_id = %cashier_id, ?payment_mode, "checkout command");

    let mut pos = state.pos.write().await;

    let cashier = pos.employee(cashier_id)?;
    if !cashier.is_active || !has_permission(cashier.role, Permission::Billing) {
        return Err(ApiError::new(
            ErrorCode::PermissionDenied,
            format!("{} is not allowed to bill", cashier.name),
        ));
    }

    let customer_id = customer
        .map(|key| pos.customer(key).map(|c| c.id.clone()))
        .transpose()?;
    let items = state.cart.with_cart(|cart| cart.items.clone());
    let pricing = state.cart.pricing();

    let committed = pos
        .commit_sale(
            &items,
            pricing,
            customer_id.as_deref(),
            cashier_id,
            payment_mode,
            now,
        )
        .await?;

    state.cart.with_cart_mut(|cart| cart.clear());
    Ok(committed)
}

/// Sales, newest first, optionally filtered by status and day.
pub async fn list_sales(
    state: &AppState,
    status: Option<SaleStatus>,
    day: Option<NaiveDate>,
) -> Result<Vec<Sale>, ApiError> {
    debug!(?status, ?day, "list_sales command");
    let pos = state.pos.read().await;
    Ok(pos
        .sales()
        .iter()
        .rev()
        .filter(|s| status.map_or(true, |status| s.status == status))
        .filter(|s| day.map_or(true, |day| pos.local_date(s.date) == day))
        .cloned()
        .collect())
}

/// Gets a sale by id or invoice number.
pub async fn get_sale(state: &AppState, key: &str) -> Result<Sale, ApiError> {
    debug!(key = %key, "get_sale command");
    let pos = state.pos.read().await;
    Ok(pos.sale(key)?.clone())
}

pub async fn update_sale_status(
    state: &AppState,
    key: &str,
    status: SaleStatus,
) -> Result<Sale, ApiError> {
    debug!(key = %key, %status, "update_sale_status command");
    let mut pos = state.pos.write().await;
    Ok(pos.update_sale_status(key, status).await?)
}

/// The invoice number the next sale will get.
pub async fn next_invoice_number(state: &AppState, now: DateTime<Utc>) -> String {
    debug!("next_invoice_number command");
    state.pos.read().await.next_invoice_number(now)
}
