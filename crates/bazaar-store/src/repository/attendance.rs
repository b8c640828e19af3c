//! # Attendance Repository
//!
//! Per-day attendance rows keyed by `(employee_id, date)`.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mark one day          upsert()       → 1 row touched                  │
//! │  mark all present      upsert_many()  → N rows, one transaction        │
//! │                                                                         │
//! │  INSERT ... ON CONFLICT(employee_id, date) DO UPDATE SET status = ...  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Marking a day never rewrites any other row.

use std::collections::BTreeMap;

use bazaar_core::attendance::{AttendanceLedger, AttendanceStatus, YearMonth};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for the `attendance` table.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AttendanceRepository { pool }
    }

    /// Sets one (employee, date) cell, overwriting any previous status.
    pub async fn upsert(&self, employee_id: &str, date: NaiveDate, status: AttendanceStatus) -> DbResult<()> {
        debug!(employee_id = %employee_id, %date, %status, "Upserting attendance");

        sqlx::query(UPSERT_SQL)
            .bind(employee_id)
            .bind(date)
            .bind(status.label())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Upserts many cells in a single transaction. All or nothing.
    pub async fn upsert_many(&self, records: &[(String, NaiveDate, AttendanceStatus)]) -> DbResult<()> {
        debug!(count = records.len(), "Upserting attendance batch");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        for (employee_id, date, status) in records {
            sqlx::query(UPSERT_SQL)
                .bind(employee_id)
                .bind(date)
                .bind(status.label())
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Loads every row into a ledger.
    pub async fn load_all(&self) -> DbResult<AttendanceLedger> {
        let rows: Vec<(String, NaiveDate, String)> =
            sqlx::query_as("SELECT employee_id, date, status FROM attendance")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Loaded attendance rows");

        rows.into_iter()
            .map(|(employee_id, date, status)| Ok((employee_id, date, parse_status(&status)?)))
            .collect()
    }

    /// One employee's marked days within a month.
    pub async fn load_month(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> DbResult<BTreeMap<NaiveDate, AttendanceStatus>> {
        let rows: Vec<(NaiveDate, String)> = sqlx::query_as(
            r#"
            SELECT date, status
            FROM attendance
            WHERE employee_id = ?1
              AND date BETWEEN ?2 AND ?3
            ORDER BY date
            "#,
        )
        .bind(employee_id)
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, status)| Ok((date, parse_status(&status)?)))
            .collect()
    }

    /// Number of stored rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO attendance (employee_id, date, status, updated_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(employee_id, date) DO UPDATE SET
        status = excluded.status,
        updated_at = excluded.updated_at
"#;

fn parse_status(text: &str) -> DbResult<AttendanceStatus> {
    text.parse()
        .map_err(|_| DbError::InvalidRecord(format!("unknown attendance status '{}'", text)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn repo() -> AttendanceRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().attendance()
    }

    #[tokio::test]
    async fn test_upsert_overwrites_single_cell() {
        let repo = repo().await;
        repo.upsert("e1", date(2026, 3, 2), AttendanceStatus::Absent).await.unwrap();
        repo.upsert("e1", date(2026, 3, 2), AttendanceStatus::Late).await.unwrap();
        repo.upsert("e1", date(2026, 3, 3), AttendanceStatus::Present).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        let ledger = repo.load_all().await.unwrap();
        assert_eq!(ledger.status("e1", date(2026, 3, 2)), Some(AttendanceStatus::Late));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = repo().await;
        for _ in 0..2 {
            repo.upsert("e1", date(2026, 3, 2), AttendanceStatus::Present).await.unwrap();
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_many() {
        let repo = repo().await;
        let day = date(2026, 3, 10);
        let records: Vec<_> = ["e1", "e2", "e3"]
            .iter()
            .map(|id| (id.to_string(), day, AttendanceStatus::Present))
            .collect();

        repo.upsert_many(&records).await.unwrap();

        let ledger = repo.load_all().await.unwrap();
        assert_eq!(ledger.len(), 3);
        assert!(ledger.iter().all(|(_, d, s)| d == day && s == AttendanceStatus::Present));
    }

    #[tokio::test]
    async fn test_load_month_bounds() {
        let repo = repo().await;
        repo.upsert("e1", date(2026, 2, 28), AttendanceStatus::Present).await.unwrap();
        repo.upsert("e1", date(2026, 3, 1), AttendanceStatus::OnLeave).await.unwrap();
        repo.upsert("e1", date(2026, 3, 31), AttendanceStatus::Absent).await.unwrap();
        repo.upsert("e1", date(2026, 4, 1), AttendanceStatus::Present).await.unwrap();
        repo.upsert("e2", date(2026, 3, 15), AttendanceStatus::Late).await.unwrap();

        let month = YearMonth::new(2026, 3).unwrap();
        let days = repo.load_month("e1", month).await.unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[&date(2026, 3, 1)], AttendanceStatus::OnLeave);
        assert_eq!(days[&date(2026, 3, 31)], AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn test_load_all_matches_ledger_month_view() {
        let repo = repo().await;
        repo.upsert("e1", date(2026, 3, 4), AttendanceStatus::Late).await.unwrap();
        repo.upsert("e1", date(2026, 3, 5), AttendanceStatus::Present).await.unwrap();

        let month = YearMonth::new(2026, 3).unwrap();
        let from_ledger = repo.load_all().await.unwrap().load_month("e1", month);
        let from_table = repo.load_month("e1", month).await.unwrap();
        assert_eq!(from_ledger, from_table);
    }
}
