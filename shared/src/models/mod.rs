//! Data models
//!
//! Shared between the storefront service and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); money is in cents.

pub mod cart;
pub mod custom_pizza;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod stock;
pub mod user;

// Re-exports
pub use cart::*;
pub use custom_pizza::*;
pub use ingredient::*;
pub use order::*;
pub use product::*;
pub use stock::*;
pub use user::*;
