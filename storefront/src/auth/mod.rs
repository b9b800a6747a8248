//! Authentication and authorization
//!
//! - [`JwtService`] - access tokens
//! - [`CurrentUser`] - authenticated user context (also an extractor)
//! - [`require_auth`] / [`require_permission`] - route middleware
//! - [`password`] - Argon2 hashing
//! - [`rate_limit`] - per-IP limits on login and registration

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use rate_limit::RateLimiter;
