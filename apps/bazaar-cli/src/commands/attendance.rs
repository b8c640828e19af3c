//! # Attendance Commands
//!
//! Calendar marking, monthly KPIs, the daily roster count and CSV export.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mark_attendance(e, d, s)     one cell, one row upserted                │
//! │  mark_all_present(d)          every active employee, one transaction    │
//! │  monthly_kpis(e, 2026-03)     working days, counts, percentage          │
//! │  daily_counters(d)            present / absent / leave / late / unmarked│
//! │  export_csv(e?, 2026-03)      one row per day (per employee)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use bazaar_core::attendance::{AttendanceStatus, DailyCounters, MonthlyKpis, YearMonth};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Outcome of marking one cell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// What the cell held before, if anything.
    pub previous: Option<AttendanceStatus>,
}

pub async fn mark_attendance(
    state: &AppState,
    employee_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<AttendanceMark, ApiError> {
    debug!(employee_id = %employee_id, %date, %status, "mark_attendance command");
    let mut pos = state.pos.write().await;
    let previous = pos.mark_attendance(employee_id, date, status).await?;
    Ok(AttendanceMark {
        employee_id: employee_id.to_string(),
        date,
        status,
        previous,
    })
}

/// Marks `employee_ids` present on `date`, or every active employee when
/// no ids are given. Returns how many cells were written.
pub async fn mark_all_present(
    state: &AppState,
    employee_ids: Option<Vec<String>>,
    date: NaiveDate,
) -> Result<usize, ApiError> {
    debug!(%date, "mark_all_present command");
    let mut pos = state.pos.write().await;
    let ids = employee_ids.unwrap_or_else(|| pos.active_employee_ids());
    Ok(pos.mark_all_present(&ids, date).await?)
}

pub async fn monthly_kpis(
    state: &AppState,
    employee_id: &str,
    month: YearMonth,
) -> Result<MonthlyKpis, ApiError> {
    debug!(employee_id = %employee_id, %month, "monthly_kpis command");
    let pos = state.pos.read().await;
    Ok(pos.monthly_kpis(employee_id, month)?)
}

/// One employee's marked days in a month, read from the attendance table.
pub async fn employee_month(
    state: &AppState,
    employee_id: &str,
    month: YearMonth,
) -> Result<BTreeMap<NaiveDate, AttendanceStatus>, ApiError> {
    debug!(employee_id = %employee_id, %month, "employee_month command");
    let pos = state.pos.read().await;
    let employee = pos.employee(employee_id)?;
    Ok(pos.db().inner().attendance().load_month(&employee.id, month).await?)
}

pub async fn daily_counters(state: &AppState, date: NaiveDate) -> Result<DailyCounters, ApiError> {
    debug!(%date, "daily_counters command");
    Ok(state.pos.read().await.daily_counters(date))
}

/// CSV sheet for one employee, or the whole active roster.
pub async fn export_csv(
    state: &AppState,
    employee_id: Option<&str>,
    month: YearMonth,
) -> Result<String, ApiError> {
    debug!(?employee_id, %month, "export_csv command");
    let pos = state.pos.read().await;
    Ok(pos.attendance_csv(employee_id, month)?)
}
