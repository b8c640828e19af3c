//! # bazaar-store: Persistence Layer for Bazaar POS
//!
//! SQLite-backed storage behind the in-memory state container.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar POS Data Flow                             │
//! │                                                                         │
//! │  PosState::load / PosState mutation                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bazaar-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ KvRepository   │   │ 001_init.sql │   │   │
//! │  │   │ SqlitePool    │◄───│ Attendance     │   │              │   │   │
//! │  │   │               │    │  Repository    │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/bazaar.db                                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Key-value and attendance repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_store::{Database, DbConfig, StorageKey};
//!
//! let db = Database::new(DbConfig::new("bazaar.db")).await?;
//!
//! let products: Option<Vec<Product>> = db.kv().get(StorageKey::Products).await?;
//! db.attendance().upsert("emp-1", today, AttendanceStatus::Present).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::attendance::AttendanceRepository;
pub use repository::kv::{KvRepository, StorageKey};
