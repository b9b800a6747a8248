//! Catalog item creation and update

use std::collections::BTreeSet;

use shared::error::ErrorCode;
use shared::models::{ProductCreate, ProductDetail, ProductKind, ProductUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::product_in_tx;
use crate::db::repository::{RepoError, RepoResult, product};
use crate::utils::validation::{MAX_NAME_LEN, MAX_PRICE, MAX_STOCK};

/// Kind-specific field rules shared by create and update
fn validate_kind_fields(
    kind: ProductKind,
    volume_ml: Option<i32>,
    alcohol_percent: Option<f64>,
    ingredient_count: usize,
) -> RepoResult<()> {
    if kind == ProductKind::Pizza {
        if ingredient_count == 0 {
            return Err(RepoError::Validation(
                "A pizza needs at least one ingredient".into(),
            ));
        }
    } else if ingredient_count > 0 {
        return Err(RepoError::Validation(format!(
            "Only pizzas have ingredients, not {kind}"
        )));
    }

    if kind.requires_volume() {
        match volume_ml {
            Some(v) if v > 0 => {}
            _ => {
                return Err(RepoError::Validation(format!(
                    "volume_ml must be positive for {kind}"
                )));
            }
        }
    } else if volume_ml.is_some() {
        return Err(RepoError::Validation(format!(
            "volume_ml is not allowed for {kind}"
        )));
    }

    if kind.requires_alcohol() {
        match alcohol_percent {
            Some(a) if a > 0.0 && a < 100.0 => {}
            _ => {
                return Err(RepoError::Validation(format!(
                    "alcohol_percent must be between 0 and 100 for {kind}"
                )));
            }
        }
    } else if alcohol_percent.is_some() {
        return Err(RepoError::Validation(format!(
            "alcohol_percent is not allowed for {kind}"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(RepoError::Validation(format!(
            "name is too long (max {MAX_NAME_LEN})"
        )));
    }
    Ok(())
}

fn validate_price(price: i64) -> RepoResult<()> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(RepoError::Validation(format!(
            "price must be between 0 and {MAX_PRICE}"
        )));
    }
    Ok(())
}

/// Replace the ingredient set of a pizza, checking every id exists
async fn replace_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    pizza_id: i64,
    ingredient_ids: &BTreeSet<i64>,
) -> RepoResult<()> {
    for id in ingredient_ids {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM ingredient WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        if exists.is_none() {
            return Err(RepoError::business(
                ErrorCode::IngredientNotFound,
                format!("Ingredient {id} not found"),
            ));
        }
    }

    sqlx::query("DELETE FROM pizza_ingredient WHERE pizza_id = ?")
        .bind(pizza_id)
        .execute(&mut **tx)
        .await?;
    for id in ingredient_ids {
        sqlx::query("INSERT INTO pizza_ingredient (pizza_id, ingredient_id) VALUES (?1, ?2)")
            .bind(pizza_id)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Insert a catalog product (and its ingredients for a pizza)
pub async fn create_product(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductDetail> {
    validate_name(&data.name)?;
    validate_price(data.price)?;
    if !(0..=MAX_STOCK).contains(&data.stock) {
        return Err(RepoError::Validation(format!(
            "stock must be between 0 and {MAX_STOCK}"
        )));
    }
    let ingredient_ids: BTreeSet<i64> = data.ingredient_ids.iter().copied().collect();
    validate_kind_fields(
        data.kind,
        data.volume_ml,
        data.alcohol_percent,
        ingredient_ids.len(),
    )?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO product (id, kind, name, description, image, price, stock, volume_ml, alcohol_percent, is_spotlight, is_active, base_pizza_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, NULL, ?11, ?11)",
    )
    .bind(id)
    .bind(data.kind)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.volume_ml)
    .bind(data.alcohol_percent)
    .bind(data.is_spotlight)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if data.kind == ProductKind::Pizza {
        replace_ingredients(&mut tx, id, &ingredient_ids).await?;
    }

    tx.commit().await?;

    tracing::info!(product_id = id, kind = %data.kind, name = %data.name.trim(), "Product created");

    product::find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update of a catalog product
pub async fn update_product(
    pool: &SqlitePool,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<ProductDetail> {
    if let Some(ref name) = data.name {
        validate_name(name)?;
    }
    if let Some(price) = data.price {
        validate_price(price)?;
    }

    let mut tx = pool.begin().await?;

    let current = match product_in_tx(&mut tx, id).await? {
        Some(p) if !p.is_custom() => p,
        _ => {
            return Err(RepoError::business(
                ErrorCode::ProductNotFound,
                format!("Product {id} not found"),
            ));
        }
    };

    let new_ingredients: Option<BTreeSet<i64>> = data
        .ingredient_ids
        .as_ref()
        .map(|ids| ids.iter().copied().collect());
    let ingredient_count = match &new_ingredients {
        Some(ids) => ids.len(),
        None => {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM pizza_ingredient WHERE pizza_id = ?")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            count as usize
        }
    };
    validate_kind_fields(
        current.kind,
        data.volume_ml.or(current.volume_ml),
        data.alcohol_percent.or(current.alcohol_percent),
        ingredient_count,
    )?;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), image = COALESCE(?3, image), price = COALESCE(?4, price), volume_ml = COALESCE(?5, volume_ml), alcohol_percent = COALESCE(?6, alcohol_percent), is_spotlight = COALESCE(?7, is_spotlight), is_active = COALESCE(?8, is_active), updated_at = ?9 WHERE id = ?10",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.price)
    .bind(data.volume_ml)
    .bind(data.alcohol_percent)
    .bind(data.is_spotlight)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(ref ids) = new_ingredients {
        replace_ingredients(&mut tx, id, ids).await?;
    }

    tx.commit().await?;

    tracing::info!(product_id = id, "Product updated");

    product::find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}
