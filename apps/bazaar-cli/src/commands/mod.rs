//! # Commands Module
//!
//! Every operation the CLI (or any other front end) can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── product.rs     ◄─── Catalog CRUD, stock edits, low-stock list
//! ├── customer.rs    ◄─── Customer CRUD, credit payments
//! ├── employee.rs    ◄─── Employee CRUD, status, permissions
//! ├── cart.rs        ◄─── Cart manipulation
//! ├── sale.rs        ◄─── Checkout, sale history, status changes
//! ├── attendance.rs  ◄─── Marking, KPIs, daily counters, CSV export
//! ├── credit.rs      ◄─── Credit check, loyalty preview and redemption
//! ├── dashboard.rs   ◄─── Store summary
//! └── config.rs      ◄─── Effective configuration
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ bazaar attendance mark EMP-ID 2026-03-02 present                     │
//! │         │                                                               │
//! │         │ (clap parses into cli::Command)                               │
//! │         ▼                                                               │
//! │  pub async fn mark_attendance(                                          │
//! │      state: &AppState,      ◄── Loaded once at startup                 │
//! │      employee_id: &str,                                                 │
//! │      date: NaiveDate,                                                   │
//! │      status: AttendanceStatus,                                          │
//! │  ) -> Result<AttendanceMark, ApiError>                                  │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: {"employeeId": "...", "status": "Present", ...}                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads take the `PosState` read lock; mutations take the write lock for
//! the whole operation, store write included.

pub mod attendance;
pub mod cart;
pub mod config;
pub mod credit;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod product;
pub mod sale;
