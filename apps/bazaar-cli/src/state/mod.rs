//! # State Module
//!
//! Application state shared by every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                          AppState                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  PosState    │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  RwLock<     │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │   products,  │  │    Cart      │  │  tax / discount  │              │
//! │  │   sales, ... │  │  >>          │  │  checkout policy │              │
//! │  │  > + DbState │  │              │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • PosState: tokio RwLock, held across the awaited store writes        │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod pos;

pub use cart::{CartResponse, CartState};
pub use config::{default_config_path, ConfigError, ConfigState, CONFIG_FILE_NAME};
pub use db::DbState;
pub use pos::{CommittedSale, CustomerInput, EmployeeInput, PosState, ProductInput, Redemption};

use bazaar_store::Database;
use tokio::sync::RwLock;

/// Everything a command can reach.
#[derive(Debug)]
pub struct AppState {
    pub pos: RwLock<PosState>,
    pub cart: CartState,
    pub config: ConfigState,
}

impl AppState {
    /// Loads the POS state from `db` with an empty cart.
    pub async fn load(db: Database, config: ConfigState) -> Self {
        let pos = PosState::load(DbState::new(db), &config).await;
        AppState {
            pos: RwLock::new(pos),
            cart: CartState::new(config.pricing()),
            config,
        }
    }
}
