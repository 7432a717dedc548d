//! Petala Salon Server - appointment management backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB storage with a repository layer
//! - **Scheduling** (`scheduling`): the pure booking validator
//! - **HTTP API** (`api`): RESTful endpoints plus the live sync WebSocket
//! - **Reminders** (`reminders`): background reminder scheduler
//!
//! # Module structure
//!
//! ```text
//! salon-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer (models, repositories)
//! ├── scheduling/    # booking validation
//! ├── reminders/     # reminder scheduler
//! └── utils/         # errors, logging, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod reminders;
pub mod scheduling;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState, SyncPayload, SyncSubscription};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load the environment and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(Some(&log_level), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____       __        __
   / __ \___  / /_____ _/ /___ _
  / /_/ / _ \/ __/ __ `/ / __ `/
 / ____/  __/ /_/ /_/ / / /_/ /
/_/    \___/\__/\__,_/_/\__,_/
    "#
    );
}
