//! Shared types for the pizzeria storefront
//!
//! Domain models, error codes, the API response envelope and small
//! utilities used by the `storefront` service and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
