//! Booking Server - restaurant table-booking backend
//!
//! # Module structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── booking/       # Reservation lifecycle and refund policy
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # Errors, logging, time, validation
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging. Call once at startup, before config.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____              __    _
   / __ )____  ____  / /__ (_)___  ____ _
  / __  / __ \/ __ \/ //_// / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,<  / / / / / /_/ /
/_____/\____/\____/_/|_|/_/_/ /_/\__, /
                                /____/
    "#
    );
}
