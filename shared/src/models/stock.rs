//! Stock Model

use serde::{Deserialize, Serialize};

use super::product::ProductKind;

/// Back-office stock row (`v_stock` view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockEntry {
    pub product_id: i64,
    pub kind: ProductKind,
    pub name: String,
    pub stock: i64,
    pub is_active: bool,
    /// Units sold in orders that were not cancelled
    pub units_sold: i64,
}

/// Absolute stock level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSet {
    pub quantity: i64,
}

/// Relative stock change (delivery received, breakage, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjust {
    pub delta: i64,
}
