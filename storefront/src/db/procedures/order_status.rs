//! Back-office order status changes

use shared::error::ErrorCode;
use shared::models::{Order, OrderStatus};
use sqlx::SqlitePool;

use crate::db::repository::order::ORDER_COLUMNS;
use crate::db::repository::{RepoError, RepoResult, order};

/// Move an order along its lifecycle. Cancelling puts the ordered units back
/// in stock within the same transaction.
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ?");
    let current = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            RepoError::business(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;

    if !current.status.can_transition_to(next) {
        return Err(RepoError::business(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot move order from {} to {}", current.status, next),
        ));
    }

    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer_order SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(next)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if next == OrderStatus::Cancelled {
        // custom pizza lines go back to their base pizza
        sqlx::query(
            "UPDATE product SET stock = stock + (SELECT SUM(ol.quantity) FROM order_line ol JOIN product sold ON sold.id = ol.product_id WHERE ol.order_id = ?1 AND COALESCE(sold.base_pizza_id, sold.id) = product.id), updated_at = ?2 WHERE id IN (SELECT COALESCE(sold.base_pizza_id, sold.id) FROM order_line ol JOIN product sold ON sold.id = ol.product_id WHERE ol.order_id = ?1)",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(order_id = id, from = %current.status, to = %next, "Order status changed");

    order::find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::business(ErrorCode::OrderNotFound, format!("Order {id} not found")))
}
