//! # Config Commands

use serde::Serialize;
use tracing::debug;

use crate::state::{AppState, ConfigState};

/// Effective configuration plus store diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub config: ConfigState,
    pub database_healthy: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub products: usize,
    pub customers: usize,
    pub employees: usize,
    pub sales: usize,
    pub attendance_records: usize,
    pub last_invoice_sequence: u32,
}

/// Gets the effective configuration.
pub fn get_config(state: &AppState) -> ConfigState {
    debug!("get_config command");
    state.config.clone()
}

/// Configuration, store health and collection sizes.
pub async fn status(state: &AppState) -> StatusReport {
    debug!("status command");
    let pos = state.pos.read().await;
    let db = pos.db().inner();

    let (migrations_total, migrations_applied) = db.migration_status().await.unwrap_or((0, 0));

    StatusReport {
        config: state.config.clone(),
        database_healthy: db.health_check().await,
        migrations_total,
        migrations_applied,
        products: pos.products().len(),
        customers: pos.customers().len(),
        employees: pos.employees().len(),
        sales: pos.sales().len(),
        attendance_records: pos.ledger().len(),
        last_invoice_sequence: pos.invoice_sequence().last_issued(),
    }
}
