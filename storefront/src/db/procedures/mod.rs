//! Transactional routines
//!
//! Each routine validates its input, runs every statement inside a single
//! SQLite transaction and commits only when all checks pass. A failed check
//! drops the transaction, which rolls it back.

pub mod catalog;
pub mod create_order;
pub mod custom_pizza;
pub mod order_status;

pub use catalog::{create_product, update_product};
pub use create_order::{NewOrder, NewOrderLine, create_order};
pub use custom_pizza::create_custom_pizza;
pub use order_status::update_status;

use super::repository::product::PRODUCT_COLUMNS;
use super::repository::RepoResult;
use shared::models::Product;
use sqlx::{Sqlite, Transaction};

/// Read a product inside a running transaction
pub(crate) async fn product_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}
