//! Product Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Ingredient, Product, ProductDetail, ProductKind};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub(crate) const PRODUCT_COLUMNS: &str = "id, kind, name, description, image, price, stock, volume_ml, alcohol_percent, is_spotlight, is_active, base_pizza_id, created_at, updated_at";

/// Storefront listing (`v_catalog`), optionally restricted to one kind
pub async fn list_catalog(
    pool: &SqlitePool,
    kind: Option<ProductKind>,
) -> RepoResult<Vec<Product>> {
    let rows = match kind {
        Some(kind) => {
            let sql = format!(
                "SELECT {PRODUCT_COLUMNS} FROM v_catalog WHERE kind = ? ORDER BY name"
            );
            sqlx::query_as::<_, Product>(&sql)
                .bind(kind)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT {PRODUCT_COLUMNS} FROM v_catalog ORDER BY kind, name");
            sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?
        }
    };
    Ok(rows)
}

/// Home page products
pub async fn list_spotlight(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM v_catalog WHERE is_spotlight = 1 ORDER BY kind, name"
    );
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Every catalog product, including inactive ones (back-office); custom pizzas are left out
pub async fn list_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE base_pizza_id IS NULL ORDER BY kind, name"
    );
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Active products among `ids`, in no particular order
pub async fn find_active_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM product WHERE is_active = 1 AND id IN ("
    ));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let rows = qb.build_query_as::<Product>().fetch_all(pool).await?;
    Ok(rows)
}

/// Ingredients of a pizza, ordered by name
pub async fn find_ingredients(pool: &SqlitePool, pizza_id: i64) -> RepoResult<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>(
        "SELECT i.id, i.name, i.is_supplement, i.supplement_price FROM pizza_ingredient pi JOIN ingredient i ON i.id = pi.ingredient_id WHERE pi.pizza_id = ? ORDER BY i.name",
    )
    .bind(pizza_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Product with its ingredients; `None` when absent
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductDetail>> {
    let Some(product) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let ingredients = if product.kind == ProductKind::Pizza {
        find_ingredients(pool, id).await?
    } else {
        Vec::new()
    };
    Ok(Some(ProductDetail {
        product,
        ingredients,
    }))
}

pub async fn set_spotlight(pool: &SqlitePool, id: i64, is_spotlight: bool) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET is_spotlight = ?1, updated_at = ?2 WHERE id = ?3 AND base_pizza_id IS NULL",
    )
    .bind(is_spotlight)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    let not_found =
        || RepoError::business(ErrorCode::ProductNotFound, format!("Product {id} not found"));
    if rows.rows_affected() == 0 {
        return Err(not_found());
    }
    find_by_id(pool, id).await?.ok_or_else(not_found)
}

/// Soft delete: the row stays for order history and stock reports
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET is_active = 0, is_spotlight = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
