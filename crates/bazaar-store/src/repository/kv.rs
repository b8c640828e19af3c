//! # Key-Value Repository
//!
//! Whole-collection JSON documents under fixed keys.
//!
//! ```text
//!   pos_products          → [Product, ...]
//!   pos_customers         → [Customer, ...]
//!   pos_employees         → [Employee, ...]
//!   pos_sales             → [Sale, ...]
//!   pos_invoice_sequence  → { "lastIssued": 42 }
//!   pos.attendance.v1     → { "{employeeId}-{yyyy-MM-dd}": "Present", ... }
//! ```
//!
//! `set` overwrites the whole value; there is no merge.

use std::fmt;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// The fixed set of storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Products,
    Customers,
    Employees,
    Sales,
    InvoiceSequence,
    /// Flat text-keyed attendance map. Only read to import into the
    /// attendance table.
    Attendance,
}

impl StorageKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Products => "pos_products",
            StorageKey::Customers => "pos_customers",
            StorageKey::Employees => "pos_employees",
            StorageKey::Sales => "pos_sales",
            StorageKey::InvoiceSequence => "pos_invoice_sequence",
            StorageKey::Attendance => "pos.attendance.v1",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository for JSON documents in `kv_store`.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads and decodes a value. `Ok(None)` when the key was never set.
    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> DbResult<Option<T>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match raw {
            Some(json) => {
                debug!(key = %key, bytes = json.len(), "Read stored value");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Encodes and stores a value, replacing whatever was there.
    pub async fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        debug!(key = %key, bytes = json.len(), "Writing stored value");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a key. Returns whether it existed.
    pub async fn remove(&self, key: StorageKey) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Removed stored value");
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use bazaar_core::{Money, Product};

    async fn repo() -> KvRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().kv()
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let kv = repo().await;
        let products: Option<Vec<Product>> = kv.get(StorageKey::Products).await.unwrap();
        assert!(products.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let kv = repo().await;
        let products = vec![
            Product::new("TEA", "Tea 250g", Money::from_major(250), 10),
            Product::new("SALT", "Salt 1kg", Money::from_major(28), 40),
        ];

        kv.set(StorageKey::Products, &products).await.unwrap();
        let loaded: Vec<Product> = kv.get(StorageKey::Products).await.unwrap().unwrap();
        assert_eq!(loaded, products);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let kv = repo().await;
        kv.set(StorageKey::Sales, &vec![1, 2, 3]).await.unwrap();
        kv.set(StorageKey::Sales, &vec![4]).await.unwrap();

        let loaded: Vec<i32> = kv.get(StorageKey::Sales).await.unwrap().unwrap();
        assert_eq!(loaded, vec![4]);
    }

    #[tokio::test]
    async fn test_remove() {
        let kv = repo().await;
        kv.set(StorageKey::Customers, &Vec::<u8>::new()).await.unwrap();

        assert!(kv.remove(StorageKey::Customers).await.unwrap());
        assert!(!kv.remove(StorageKey::Customers).await.unwrap());
        let gone: Option<Vec<u8>> = kv.get(StorageKey::Customers).await.unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_serialization_error() {
        let kv = repo().await;
        kv.set(StorageKey::Employees, "not a list").await.unwrap();

        let result: DbResult<Option<Vec<Product>>> = kv.get(StorageKey::Employees).await;
        assert!(matches!(result, Err(DbError::Serialization(_))));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(StorageKey::Products.as_str(), "pos_products");
        assert_eq!(StorageKey::Attendance.to_string(), "pos.attendance.v1");
    }
}
