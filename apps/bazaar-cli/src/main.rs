//! # Bazaar POS Entry Point
//!
//! Parses arguments, runs one command and maps failures to an exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          bazaar <command>                               │
//! │                                                                         │
//! │  main.rs ────► tracing, argument parsing, exit code                     │
//! │                                                                         │
//! │  lib.rs ─────► config, database, state, dispatch                        │
//! │                                                                         │
//! │  stdout ─────► JSON result (CSV for attendance export)                  │
//! │  stderr ─────► logs, and {"code": ..., "message": ...} on failure       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use bazaar_cli::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    bazaar_cli::init_tracing();
    let cli = Cli::parse();

    match bazaar_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}
