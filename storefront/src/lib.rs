//! Pizzeria storefront service
//!
//! # Architecture
//!
//! JSON HTTP service for a pizzeria shop: public catalog, session cart with
//! custom pizzas, customer accounts, checkout and a back-office.
//!
//! Requests flow router → handler → repository / procedure → response
//! envelope. Read models are SQL views; multi-statement writes (order
//! creation, custom pizza allocation, catalog items) are transactional
//! routines in [`db::procedures`].
//!
//! # Module layout
//!
//! ```text
//! storefront/src/
//! ├── core/      # configuration, state, server, background tasks
//! ├── auth/      # JWT, Argon2, permissions, rate limiting
//! ├── session/   # cookie sessions holding the cart
//! ├── cart/      # cart model and catalog resolution
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # SQLite pool, repositories, procedures
//! └── utils/     # logging, validation, response helpers
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod session;
pub mod utils;

// Re-exports
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use session::{Session, SessionStore};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Security event on the `security` target
///
/// ```ignore
/// security_log!("WARN", "permission_denied", user_id = user.id);
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and install the logger.
///
/// Reads `LOG_LEVEL`, `LOG_DIR` and `ENVIRONMENT` directly so configuration
/// loading itself can log. Production logs are JSON.
pub fn setup_environment() {
    let dotenv = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());
    let json = std::env::var("ENVIRONMENT").is_ok_and(|e| e == "production");
    init_logger_with_file(&log_level, json, log_dir.as_deref());

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read .env"),
    }
}
