//! # Repository Module
//!
//! Storage repositories for Bazaar POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PosState                                                              │
//! │       │                                                                 │
//! │       │  db.kv().set(StorageKey::Products, &products)                  │
//! │       │  db.attendance().upsert(employee_id, date, status)             │
//! │       ▼                                                                 │
//! │  KvRepository                    AttendanceRepository                  │
//! │  ├── get(key)                    ├── upsert(employee, date, status)    │
//! │  ├── set(key, value)             ├── upsert_many(records)              │
//! │  └── remove(key)                 ├── load_all()                        │
//! │                                  └── load_month(employee, month)       │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  kv_store table                  attendance table                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - JSON documents keyed by [`kv::StorageKey`]
//! - [`attendance::AttendanceRepository`] - Per-day attendance rows

pub mod attendance;
pub mod kv;
