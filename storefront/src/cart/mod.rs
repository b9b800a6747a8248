//! Session cart
//!
//! Product ids and quantities grouped by product kind. Prices and names are
//! never stored here; [`view`] resolves them against the catalog on read.

pub mod view;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::models::ProductKind;

use crate::utils::{AppError, ErrorCode};

/// Highest quantity a single cart line may hold
pub const MAX_LINE_QUANTITY: i64 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: BTreeMap<ProductKind, Vec<CartEntry>>,
}

/// Quantity must lie in `1..=MAX_LINE_QUANTITY`
pub fn check_quantity(quantity: i64) -> Result<(), AppError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("Quantity must be between 1 and {MAX_LINE_QUANTITY}"),
        )
        .with_detail("quantity", quantity));
    }
    Ok(())
}

fn entry_not_found(kind: ProductKind, product_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CartItemNotFound,
        format!("No {kind} {product_id} in cart"),
    )
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units; an existing line for the same product is increased.
    ///
    /// Returns the resulting line quantity.
    pub fn add(
        &mut self,
        kind: ProductKind,
        product_id: i64,
        quantity: i64,
    ) -> Result<i64, AppError> {
        check_quantity(quantity)?;
        let entries = self.items.entry(kind).or_default();
        match entries.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => {
                let total = entry.quantity + quantity;
                check_quantity(total)?;
                entry.quantity = total;
                Ok(total)
            }
            None => {
                entries.push(CartEntry {
                    product_id,
                    quantity,
                });
                Ok(quantity)
            }
        }
    }

    /// Replace the quantity of an existing line
    pub fn update_quantity(
        &mut self,
        kind: ProductKind,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), AppError> {
        check_quantity(quantity)?;
        let entry = self
            .items
            .get_mut(&kind)
            .and_then(|entries| entries.iter_mut().find(|e| e.product_id == product_id))
            .ok_or_else(|| entry_not_found(kind, product_id))?;
        entry.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, kind: ProductKind, product_id: i64) -> Result<(), AppError> {
        let entries = self
            .items
            .get_mut(&kind)
            .ok_or_else(|| entry_not_found(kind, product_id))?;
        let before = entries.len();
        entries.retain(|e| e.product_id != product_id);
        if entries.len() == before {
            return Err(entry_not_found(kind, product_id));
        }
        if entries.is_empty() {
            self.items.remove(&kind);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(Vec::is_empty)
    }

    /// Entries in kind order, then insertion order
    pub fn entries(&self) -> impl Iterator<Item = (ProductKind, CartEntry)> + '_ {
        self.items
            .iter()
            .flat_map(|(kind, entries)| entries.iter().map(move |e| (*kind, *e)))
    }

    pub fn product_ids(&self) -> Vec<i64> {
        self.entries().map(|(_, e)| e.product_id).collect()
    }

    /// Drop every entry whose product id is not in `keep`; returns how many went
    pub fn retain_products(&mut self, keep: impl Fn(ProductKind, i64) -> bool) -> usize {
        let mut dropped = 0;
        for (kind, entries) in self.items.iter_mut() {
            let before = entries.len();
            entries.retain(|e| keep(*kind, e.product_id));
            dropped += before - entries.len();
        }
        self.items.retain(|_, entries| !entries.is_empty());
        dropped
    }
}
