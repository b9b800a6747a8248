//! Cart reconstitution against the catalog

use std::collections::HashMap;

use shared::models::{CartView, CartViewLine, ProductKind};
use sqlx::SqlitePool;

use super::Cart;
use crate::db::repository::{RepoError, RepoResult, product};
use crate::session::Session;
use crate::utils::AppResult;

/// Cart view plus the entries that no longer resolve to a live product
#[derive(Debug, Clone)]
pub struct ResolvedCart {
    pub view: CartView,
    pub stale: Vec<(ProductKind, i64)>,
}

impl ResolvedCart {
    pub fn has_stale(&self) -> bool {
        !self.stale.is_empty()
    }
}

/// Load every product in the cart with one query and build the view.
///
/// An entry is stale when its product is gone, deactivated, or no longer of
/// the kind it was filed under.
pub async fn resolve(pool: &SqlitePool, cart: &Cart) -> RepoResult<ResolvedCart> {
    if cart.is_empty() {
        return Ok(ResolvedCart {
            view: CartView::default(),
            stale: Vec::new(),
        });
    }

    let products: HashMap<i64, _> = product::find_active_by_ids(pool, &cart.product_ids())
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut lines = Vec::new();
    let mut stale = Vec::new();
    for (kind, entry) in cart.entries() {
        match products.get(&entry.product_id) {
            Some(p) if p.kind == kind => {
                let line_total = p
                    .price
                    .checked_mul(entry.quantity)
                    .ok_or_else(total_out_of_range)?;
                lines.push(CartViewLine {
                    line_total,
                    product: p.clone(),
                    quantity: entry.quantity,
                });
            }
            _ => stale.push((kind, entry.product_id)),
        }
    }

    Ok(ResolvedCart {
        view: CartView::from_lines(lines).ok_or_else(total_out_of_range)?,
        stale,
    })
}

fn total_out_of_range() -> RepoError {
    RepoError::Validation("Cart total is out of range".into())
}

/// Resolve the session cart and prune its stale entries from the session.
///
/// The returned `stale` list still names what was dropped.
pub async fn resolve_session(pool: &SqlitePool, session: &Session) -> AppResult<ResolvedCart> {
    let resolved = resolve(pool, &session.cart()).await?;
    if resolved.has_stale() {
        let stale = resolved.stale.clone();
        let dropped =
            session.update_cart(|cart| cart.retain_products(|kind, id| !stale.contains(&(kind, id))))?;
        tracing::debug!(session = %session.id(), dropped, "Stale cart entries pruned");
    }
    Ok(resolved)
}
