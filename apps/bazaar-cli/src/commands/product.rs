//! # Product Commands
//!
//! Catalog maintenance and stock edits.
//!
//! ## Stock Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust_stock(+24)   ── goods received                                  │
//! │  adjust_stock(-2)    ── damaged / written off                           │
//! │  sale::checkout      ── one decrement per cart line                     │
//! │                                                                         │
//! │  All three go through the same stock update inside PosState.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::Product;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, ProductInput};

/// Lists products matching `query` (name, SKU, category or barcode).
/// An empty query lists everything.
pub async fn search_products(state: &AppState, query: &str) -> Result<Vec<Product>, ApiError> {
    debug!(query = %query, "search_products command");
    let pos = state.pos.read().await;
    Ok(pos.search_products(query)?.into_iter().cloned().collect())
}

/// Gets a product by id or SKU.
pub async fn get_product(state: &AppState, key: &str) -> Result<Product, ApiError> {
    debug!(key = %key, "get_product command");
    let pos = state.pos.read().await;
    Ok(pos.product(key)?.clone())
}

pub async fn add_product(state: &AppState, input: ProductInput) -> Result<Product, ApiError> {
    debug!(sku = %input.sku, "add_product command");
    let mut pos = state.pos.write().await;
    Ok(pos.add_product(input).await?)
}

pub async fn update_product(
    state: &AppState,
    key: &str,
    input: ProductInput,
) -> Result<Product, ApiError> {
    debug!(key = %key, "update_product command");
    let mut pos = state.pos.write().await;
    let id = pos.product(key)?.id.clone();
    Ok(pos.update_product(&id, input).await?)
}

pub async fn delete_product(state: &AppState, key: &str) -> Result<Product, ApiError> {
    debug!(key = %key, "delete_product command");
    let mut pos = state.pos.write().await;
    let id = pos.product(key)?.id.clone();
    Ok(pos.delete_product(&id).await?)
}

/// Adds `delta` units to stock (negative removes).
pub async fn adjust_stock(state: &AppState, key: &str, delta: i64) -> Result<Product, ApiError> {
    debug!(key = %key, delta, "adjust_stock command");
    let mut pos = state.pos.write().await;
    let id = pos.product(key)?.id.clone();
    Ok(pos.adjust_stock(&id, delta).await?)
}

/// Products at or below their reorder level, lowest stock first.
pub async fn low_stock(state: &AppState) -> Result<Vec<Product>, ApiError> {
    debug!("low_stock command");
    let pos = state.pos.read().await;
    Ok(pos.low_stock().into_iter().cloned().collect())
}
