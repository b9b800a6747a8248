//! Order Repository (reads)
//!
//! Writes go through `db::procedures`.

use super::RepoResult;
use shared::models::{Order, OrderDetail, OrderLine, OrderStatus, OrderSummary};
use sqlx::SqlitePool;

pub(crate) const ORDER_COLUMNS: &str = "id, user_id, status, delivery_mode, street, postal_code, city, payment_method, payment_reference, total, note, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, user_id, customer_email, customer_name, status, delivery_mode, payment_method, total, line_count, item_count, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let rows = sqlx::query_as::<_, OrderLine>(
        "SELECT id, order_id, product_id, product_name, unit_price, quantity FROM order_line WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let lines = find_lines(pool, id).await?;
    Ok(Some(OrderDetail { order, lines }))
}

/// Order owned by `user_id`; other users' orders read as absent
pub async fn find_detail_for_user(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> RepoResult<Option<OrderDetail>> {
    match find_detail(pool, id).await? {
        Some(detail) if detail.order.user_id == user_id => Ok(Some(detail)),
        _ => Ok(None),
    }
}

/// Customer order history, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM customer_order WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Back-office listing (`v_order_summary`), newest first
pub async fn find_summaries(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<OrderSummary>> {
    let rows = match status {
        Some(status) => {
            let sql = format!(
                "SELECT {SUMMARY_COLUMNS} FROM v_order_summary WHERE status = ? ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, OrderSummary>(&sql)
                .bind(status)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {SUMMARY_COLUMNS} FROM v_order_summary ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, OrderSummary>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}
