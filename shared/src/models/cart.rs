//! Cart request and view types
//!
//! The cart itself lives in the server session as product ids only; these
//! types carry requests in and reconstituted product lines out.

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductKind};

/// Add an entry to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemAdd {
    pub kind: ProductKind,
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Replace the quantity of an existing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartQuantityUpdate {
    pub quantity: i64,
}

/// One cart entry resolved against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartViewLine {
    pub product: Product,
    pub quantity: i64,
    /// `product.price * quantity`, in cents
    pub line_total: i64,
}

/// Cart resolved against the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartViewLine>,
    /// Sum of quantities
    pub item_count: i64,
    /// Sum of line totals, in cents
    pub total: i64,
}

impl CartView {
    /// `None` when a sum leaves the `i64` range
    pub fn from_lines(lines: Vec<CartViewLine>) -> Option<Self> {
        let mut item_count: i64 = 0;
        let mut total: i64 = 0;
        for line in &lines {
            item_count = item_count.checked_add(line.quantity)?;
            total = total.checked_add(line.line_total)?;
        }
        Some(Self {
            lines,
            item_count,
            total,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
