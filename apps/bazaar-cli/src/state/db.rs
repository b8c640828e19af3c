//! # Database State
//!
//! Wraps the store handle with the load/persist policy of the state
//! container.
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load_or_default(key)                                                   │
//! │       │                                                                 │
//! │       ├── Ok(Some(value)) ──► value                                     │
//! │       ├── Ok(None) ─────────► T::default()   (first run)                │
//! │       └── Err(e) ───────────► warn!, T::default()                       │
//! │                                                                         │
//! │  persist(key, value)                                                    │
//! │       │                                                                 │
//! │       ├── Ok ───────────────► done                                      │
//! │       └── Err(e) ───────────► warn!, dropped                            │
//! │                               (in-memory state stays authoritative)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::attendance::{AttendanceLedger, AttendanceStatus};
use bazaar_store::{Database, StorageKey};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Reads a collection, falling back to its default on a miss or a failure.
    pub async fn load_or_default<T>(&self, key: StorageKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.db.kv().get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored collection, starting empty");
                T::default()
            }
        }
    }

    /// Writes a collection back. Failures are logged and dropped.
    pub async fn persist<T>(&self, key: StorageKey, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if let Err(e) = self.db.kv().set(key, value).await {
            warn!(key = %key, error = %e, "Failed to persist collection");
        }
    }

    /// Loads the attendance ledger.
    ///
    /// On first start after an upgrade the table is empty while the old
    /// text-keyed map may still exist; that map is imported once.
    pub async fn load_ledger(&self) -> AttendanceLedger {
        let repo = self.db.attendance();

        let ledger = match repo.load_all().await {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(error = %e, "Failed to read attendance, starting empty");
                return AttendanceLedger::new();
            }
        };
        if !ledger.is_empty() {
            return ledger;
        }

        let legacy: AttendanceLedger = self.load_or_default(StorageKey::Attendance).await;
        if legacy.is_empty() {
            return ledger;
        }

        let records: Vec<_> = legacy
            .iter()
            .map(|(id, date, status)| (id.to_string(), date, status))
            .collect();
        match repo.upsert_many(&records).await {
            Ok(()) => info!(count = records.len(), "Imported legacy attendance map"),
            Err(e) => warn!(error = %e, "Failed to import legacy attendance map"),
        }
        legacy
    }

    /// Writes the given attendance cells. Failures are logged and dropped.
    pub async fn persist_attendance(&self, records: &[(String, NaiveDate, AttendanceStatus)]) {
        let result = match records {
            [(employee_id, date, status)] => {
                self.db.attendance().upsert(employee_id, *date, *status).await
            }
            _ => self.db.attendance().upsert_many(records).await,
        };
        if let Err(e) = result {
            warn!(count = records.len(), error = %e, "Failed to persist attendance");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::attendance::attendance_key;
    use bazaar_store::DbConfig;
    use std::collections::BTreeMap;

    async fn state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_missing_collection_defaults() {
        let db = state().await;
        let sales: Vec<bazaar_core::Sale> = db.load_or_default(StorageKey::Sales).await;
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_collection_defaults() {
        let db = state().await;
        db.persist(StorageKey::Products, "garbage").await;
        let products: Vec<bazaar_core::Product> = db.load_or_default(StorageKey::Products).await;
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_attendance_is_imported_once() {
        let db = state().await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut legacy = BTreeMap::new();
        legacy.insert(attendance_key("emp-1", day), AttendanceStatus::Late);
        db.persist(StorageKey::Attendance, &legacy).await;

        let ledger = db.load_ledger().await;
        assert_eq!(ledger.status("emp-1", day), Some(AttendanceStatus::Late));
        assert_eq!(db.inner().attendance().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_persist_after_close_is_swallowed() {
        let db = state().await;
        db.inner().close().await;

        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        db.persist(StorageKey::Sales, &Vec::<u8>::new()).await;
        db.persist_attendance(&[("emp-1".to_string(), day, AttendanceStatus::Present)])
            .await;
    }
}
