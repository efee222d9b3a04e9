//! # State Module
//!
//! Application state for the desk app, split by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   SessionState   │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  QuoteStore  │  │  Arc<Mutex<      │  │  storage_key     │          │
//! │  │  (SQLite or  │  │    Session       │  │  catalog_path    │          │
//! │  │   memory)    │  │  >>              │  │  currency        │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: pool / async mutex inside the backend                      │
//! │  • SessionState: Arc<Mutex<T>>, never held across .await               │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take exactly the states they need.

mod config;
mod db;
mod session;

pub use config::ConfigState;
pub use db::DbState;
pub use session::{Session, SessionState};
