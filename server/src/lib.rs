//! Daily Food House Server - restaurant order backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): public intake + back-office and courier routes
//! - **Order lifecycle** (`orders`): state machine, OTP issuance, courier assignment
//! - **Storage** (`db`): in-memory engine behind per-entity repositories
//! - **Notifications** (`services`): WhatsApp gateway client
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # Configuration, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # Order lifecycle service
//! ├── services/      # WhatsApp notification service
//! ├── db/            # Storage engine and repositories
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderLifecycle};
pub use services::WhatsAppService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging. Call once, before anything logs.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____        _ __         ______                __
   / __ \____ _(_) /_  __   / ____/___  ____  ____/ /
  / / / / __ `/ / / / / /  / /_  / __ \/ __ \/ __  /
 / /_/ / /_/ / / / /_/ /  / __/ / /_/ / /_/ / /_/ /
/_____/\__,_/_/_/\__, /  /_/    \____/\____/\__,_/
                /____/
    "#
    );
}
