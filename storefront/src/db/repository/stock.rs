//! Stock Repository
//!
//! Custom pizzas carry no stock of their own and are never listed here.

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::StockEntry;
use sqlx::SqlitePool;

use crate::utils::validation::MAX_STOCK;

const STOCK_COLUMNS: &str = "product_id, kind, name, stock, is_active, units_sold";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StockEntry>> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM v_stock ORDER BY kind, name");
    let rows = sqlx::query_as::<_, StockEntry>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Active products at or below `threshold`, scarcest first
pub async fn find_low(pool: &SqlitePool, threshold: i64) -> RepoResult<Vec<StockEntry>> {
    let sql = format!(
        "SELECT {STOCK_COLUMNS} FROM v_stock WHERE is_active = 1 AND stock <= ? ORDER BY stock, name"
    );
    let rows = sqlx::query_as::<_, StockEntry>(&sql)
        .bind(threshold)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Option<StockEntry>> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM v_stock WHERE product_id = ?");
    let row = sqlx::query_as::<_, StockEntry>(&sql)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Set an absolute stock level
pub async fn set(pool: &SqlitePool, product_id: i64, quantity: i64) -> RepoResult<StockEntry> {
    if !(0..=MAX_STOCK).contains(&quantity) {
        return Err(RepoError::Validation(format!(
            "quantity must be between 0 and {MAX_STOCK}"
        )));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET stock = ?1, updated_at = ?2 WHERE id = ?3 AND base_pizza_id IS NULL",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(product_id));
    }
    find_by_product(pool, product_id)
        .await?
        .ok_or_else(|| not_found(product_id))
}

/// Apply a relative change.
///
/// The resulting level must stay within `0..=MAX_STOCK`; otherwise nothing
/// is written.
pub async fn adjust(pool: &SqlitePool, product_id: i64, delta: i64) -> RepoResult<StockEntry> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {STOCK_COLUMNS} FROM v_stock WHERE product_id = ?");
    let current = sqlx::query_as::<_, StockEntry>(&sql)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(product_id))?;

    let next = match current.stock.checked_add(delta) {
        Some(next) if next < 0 => {
            return Err(RepoError::business(
                ErrorCode::InsufficientStock,
                format!(
                    "Cannot remove {} units from '{}': only {} in stock",
                    delta.unsigned_abs(),
                    current.name,
                    current.stock
                ),
            ));
        }
        Some(next) if next <= MAX_STOCK => next,
        _ => {
            return Err(RepoError::Validation(format!(
                "Stock of '{}' cannot exceed {MAX_STOCK}",
                current.name
            )));
        }
    };

    sqlx::query("UPDATE product SET stock = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(next)
        .bind(shared::util::now_millis())
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StockEntry {
        stock: next,
        ..current
    })
}

fn not_found(product_id: i64) -> RepoError {
    RepoError::business(
        ErrorCode::ProductNotFound,
        format!("Product {product_id} not found"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_set_and_adjust() {
        let db = DbService::in_memory().await.unwrap();

        let entry = set(&db.pool, 301, 10).await.unwrap();
        assert_eq!(entry.stock, 10);

        let entry = adjust(&db.pool, 301, -4).await.unwrap();
        assert_eq!(entry.stock, 6);

        let entry = adjust(&db.pool, 301, 24).await.unwrap();
        assert_eq!(entry.stock, 30);
    }

    #[tokio::test]
    async fn test_adjust_below_zero_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        set(&db.pool, 401, 2).await.unwrap();

        let err = adjust(&db.pool, 401, -3).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::InsufficientStock, _)
        ));
        let entry = find_by_product(&db.pool, 401).await.unwrap().unwrap();
        assert_eq!(entry.stock, 2);
    }

    #[tokio::test]
    async fn test_negative_set_and_unknown_product() {
        let db = DbService::in_memory().await.unwrap();
        assert!(matches!(
            set(&db.pool, 301, -1).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            adjust(&db.pool, 9999, 1).await.unwrap_err(),
            RepoError::Business(ErrorCode::ProductNotFound, _)
        ));
    }

    #[tokio::test]
    async fn test_adjust_out_of_range_leaves_stock_untouched() {
        let db = DbService::in_memory().await.unwrap();
        set(&db.pool, 301, 10).await.unwrap();

        assert!(matches!(
            adjust(&db.pool, 301, i64::MAX).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            adjust(&db.pool, 301, MAX_STOCK).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            adjust(&db.pool, 301, i64::MIN).await.unwrap_err(),
            RepoError::Business(ErrorCode::InsufficientStock, _)
        ));

        let entry = find_by_product(&db.pool, 301).await.unwrap().unwrap();
        assert_eq!(entry.stock, 10);
        // the catalog still reads back after the rejected changes
        assert!(!find_all(&db.pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_above_ceiling_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        assert!(matches!(
            set(&db.pool, 301, MAX_STOCK + 1).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert_eq!(set(&db.pool, 301, MAX_STOCK).await.unwrap().stock, MAX_STOCK);
    }

    #[tokio::test]
    async fn test_low_stock_threshold() {
        let db = DbService::in_memory().await.unwrap();
        set(&db.pool, 502, 1).await.unwrap();
        set(&db.pool, 302, 3).await.unwrap();

        let low = find_low(&db.pool, 5).await.unwrap();
        let ids: Vec<i64> = low.iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![502, 302]);
    }
}
