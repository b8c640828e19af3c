//! # Dashboard Command

use bazaar_core::attendance::DailyCounters;
use bazaar_core::summary::DashboardSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Store summary plus today's attendance head-count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub store_name: String,
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub attendance: DailyCounters,
    pub next_invoice_number: String,
}

pub async fn dashboard(state: &AppState, now: DateTime<Utc>) -> Result<Dashboard, ApiError> {
    debug!("dashboard command");
    let pos = state.pos.read().await;
    let today = pos.local_date(now);
    Ok(Dashboard {
        store_name: state.config.store_name.clone(),
        summary: pos.dashboard(today),
        attendance: pos.daily_counters(today),
        next_invoice_number: pos.next_invoice_number(now),
    })
}
