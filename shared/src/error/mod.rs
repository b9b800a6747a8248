//! Error codes, `AppError` and the response envelope
//!
//! | Range | Family |
//! |-------|--------|
//! | 0xxx | general (validation, conflicts, rate limiting) |
//! | 1xxx | authentication |
//! | 2xxx | permissions |
//! | 4xxx | orders |
//! | 5xxx | payment |
//! | 6xxx | products and ingredients |
//! | 7xxx | cart |
//! | 9xxx | system |
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::validation("Postal code must have 5 digits")
//!     .with_detail("field", "postal_code");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let response = ApiResponse::<()>::from(err);
//! assert_eq!(response.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
