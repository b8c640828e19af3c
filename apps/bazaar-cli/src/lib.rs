//! # Bazaar CLI Library
//!
//! Back-office application for the Bazaar POS. The binary in `main.rs` only
//! parses arguments and reports errors; everything else lives here so the
//! integration tests can drive the same commands.
//!
//! ## Module Organization
//! ```text
//! bazaar_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── db.rs       ◄─── Collection load/persist over the store
//! │   ├── pos.rs      ◄─── In-memory shop records and mutations
//! │   ├── cart.rs     ◄─── Current cart and bill-level pricing
//! │   └── config.rs   ◄─── Config file + environment
//! ├── commands/       ◄─── One module per area (product, sale, attendance, ...)
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Load Config ──────────────────────────────────────────────────────► │
//! │     • defaults, then config.toml, then BAZAAR_* variables               │
//! │     • --db overrides the database path                                  │
//! │                                                                         │
//! │  2. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode                                              │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  3. Load State ───────────────────────────────────────────────────────► │
//! │     • collections, attendance ledger, invoice counter                   │
//! │     • empty cart priced from config                                     │
//! │                                                                         │
//! │  4. Dispatch ─────────────────────────────────────────────────────────► │
//! │     • run one command, print JSON (or CSV) to stdout                    │
//! │     • close the pool                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::io::Write;

use bazaar_store::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Output};
use error::ApiError;
use state::{AppState, ConfigState};

/// Runs one CLI invocation end to end.
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let mut config = ConfigState::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }

    let db_path = config.database_path()?;
    info!(db_path = %db_path.display(), "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let state = AppState::load(db.clone(), config).await;

    let result = cli::dispatch(&state, cli.command).await;
    db.close().await;

    print_output(result?)
}

fn print_output(output: Output) -> Result<(), ApiError> {
    let text = match output {
        Output::Json(value) => serde_json::to_string_pretty(&value)
            .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?,
        Output::Text(text) => text,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end())
        .map_err(|e| ApiError::internal(format!("Failed to write output: {}", e)))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bazaar=trace` - Show trace for bazaar crates only
/// - Default: INFO, debug for bazaar crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
