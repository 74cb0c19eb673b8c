//! POS server - restaurant order backend
//!
//! # Architecture
//!
//! ```text
//! pos-server/src/
//! ├── core/     # config, state, HTTP server
//! ├── auth/     # JWT authentication, role policy
//! ├── api/      # HTTP routes and handlers
//! ├── db/       # embedded SurrealDB models and repositories
//! ├── orders/   # order engine + daily order numbering
//! ├── ws/       # WebSocket event fan-out
//! └── utils/    # error re-exports, logging
//! ```
//!
//! Servers create orders against the menu catalog; the order engine
//! prices them, issues a daily ticket number, drives the status state
//! machine and announces every committed transition on the push channel.
//! Station displays (grill/kitchen) and the cashier consume filtered
//! views plus the live event stream.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;
pub mod ws;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderEngine, OrderSequence};
pub use utils::{AppError, AppResult};
pub use ws::Broadcaster;

// Re-export logger functions
pub use utils::logger::init_logger;

/// Security logging macro - events land in the "security" tracing target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::warn!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Set up process environment: dotenv, logging
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("ENVIRONMENT")
        .map(|e| e == "production")
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    utils::logger::init_logger_with_file(&level, json, log_dir.as_deref())?;
    Ok(())
}
