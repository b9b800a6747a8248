//! Permission Definitions
//!
//! Customers need no permission for the storefront itself; back-office
//! routes are gated per module.

use shared::models::UserRole;

pub const CATALOG_MANAGE: &str = "catalog:manage";
pub const STOCK_MANAGE: &str = "stock:manage";
pub const ORDERS_MANAGE: &str = "orders:manage";

/// Grants every permission
pub const ALL: &str = "all";

/// Permissions baked into a token at login
pub fn permissions_for_role(role: UserRole) -> Vec<String> {
    match role {
        UserRole::Admin => vec![ALL.to_string()],
        UserRole::Customer => Vec::new(),
    }
}
