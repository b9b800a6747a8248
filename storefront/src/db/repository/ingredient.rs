//! Ingredient Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Ingredient, IngredientCreate};
use sqlx::SqlitePool;

use crate::utils::validation::MAX_PRICE;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, is_supplement, supplement_price FROM ingredient ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The fixed supplement allow-list offered on custom pizzas
pub async fn find_supplements(pool: &SqlitePool) -> RepoResult<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, is_supplement, supplement_price FROM ingredient WHERE is_supplement = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ingredient>> {
    let row = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, is_supplement, supplement_price FROM ingredient WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: IngredientCreate) -> RepoResult<Ingredient> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if !(0..=MAX_PRICE).contains(&data.supplement_price) {
        return Err(RepoError::Validation(format!(
            "supplement_price must be between 0 and {MAX_PRICE}"
        )));
    }
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO ingredient (id, name, is_supplement, supplement_price) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(name)
    .bind(data.is_supplement)
    .bind(data.supplement_price)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::business(
            ErrorCode::IngredientNameExists,
            format!("Ingredient '{name}' already exists"),
        ),
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ingredient".into()))
}
