//! Custom pizza allocation

use std::collections::{BTreeMap, BTreeSet};

use shared::error::ErrorCode;
use shared::models::{CustomPizzaCreated, CustomPizzaRequest, Ingredient, ProductKind};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::product_in_tx;
use crate::db::repository::{RepoError, RepoResult};

fn invalid(msg: impl Into<String>) -> RepoError {
    RepoError::business(ErrorCode::InvalidCustomization, msg)
}

/// Active custom pizza of `base_id` with the same price, toppings and changes
async fn find_identical(
    tx: &mut Transaction<'_, Sqlite>,
    base_id: i64,
    price: i64,
    toppings: &BTreeSet<i64>,
    changes: &BTreeSet<(i64, String)>,
) -> RepoResult<Option<i64>> {
    let candidates: Vec<i64> = sqlx::query_scalar(
        "SELECT id FROM product WHERE base_pizza_id = ?1 AND price = ?2 AND is_active = 1 ORDER BY created_at",
    )
    .bind(base_id)
    .bind(price)
    .fetch_all(&mut **tx)
    .await?;

    for id in candidates {
        let their_toppings: BTreeSet<i64> =
            sqlx::query_scalar("SELECT ingredient_id FROM pizza_ingredient WHERE pizza_id = ?")
                .bind(id)
                .fetch_all(&mut **tx)
                .await?
                .into_iter()
                .collect();
        if &their_toppings != toppings {
            continue;
        }
        let their_changes: BTreeSet<(i64, String)> = sqlx::query_as::<_, (i64, String)>(
            "SELECT ingredient_id, change FROM custom_pizza_change WHERE pizza_id = ?",
        )
        .bind(id)
        .fetch_all(&mut **tx)
        .await?
        .into_iter()
        .collect();
        if &their_changes == changes {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Derive a pizza product from a catalog pizza.
///
/// An unchanged request returns the base pizza id without writing anything,
/// and a customization identical to an existing one returns that product.
pub async fn create_custom_pizza(
    pool: &SqlitePool,
    req: &CustomPizzaRequest,
) -> RepoResult<CustomPizzaCreated> {
    req.validate_shape()
        .map_err(|e| RepoError::business(e.code, e.message))?;

    let mut tx = pool.begin().await?;

    let base = match product_in_tx(&mut tx, req.base_pizza_id).await? {
        Some(p) if p.is_active => p,
        _ => {
            return Err(RepoError::business(
                ErrorCode::ProductNotFound,
                format!("Pizza {} not found", req.base_pizza_id),
            ));
        }
    };
    if base.kind != ProductKind::Pizza {
        return Err(RepoError::business(
            ErrorCode::ProductKindMismatch,
            format!("'{}' is not a pizza", base.name),
        ));
    }
    if base.is_custom() {
        return Err(invalid("A custom pizza cannot be customized again"));
    }

    if req.is_unchanged() {
        return Ok(CustomPizzaCreated {
            product_id: base.id,
            created: false,
            price: base.price,
        });
    }

    // id -> ingredient, for the base pizza
    let mut toppings: BTreeMap<i64, Ingredient> = sqlx::query_as::<_, Ingredient>(
        "SELECT i.id, i.name, i.is_supplement, i.supplement_price FROM pizza_ingredient pi JOIN ingredient i ON i.id = pi.ingredient_id WHERE pi.pizza_id = ?",
    )
    .bind(base.id)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .map(|i| (i.id, i))
    .collect();

    let mut removed_names = Vec::with_capacity(req.removed_ingredient_ids.len());
    for id in &req.removed_ingredient_ids {
        match toppings.remove(id) {
            Some(ingredient) => removed_names.push(ingredient.name),
            None => {
                return Err(invalid(format!(
                    "Ingredient {id} is not on '{}'",
                    base.name
                )));
            }
        }
    }

    let mut added_names = Vec::with_capacity(req.added_supplement_ids.len());
    let mut price = base.price;
    for id in &req.added_supplement_ids {
        let supplement = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, is_supplement, supplement_price FROM ingredient WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let supplement = match supplement {
            Some(s) if s.is_supplement => s,
            _ => return Err(invalid(format!("Ingredient {id} is not an available supplement"))),
        };
        if toppings.contains_key(id) {
            return Err(invalid(format!(
                "'{}' is already on '{}'",
                supplement.name, base.name
            )));
        }
        price = price
            .checked_add(supplement.supplement_price)
            .ok_or_else(|| RepoError::Validation("Pizza price is out of range".into()))?;
        added_names.push(supplement.name.clone());
        toppings.insert(supplement.id, supplement);
    }

    let mut changes = Vec::new();
    if !removed_names.is_empty() {
        changes.push(format!("without {}", removed_names.join(", ")));
    }
    if !added_names.is_empty() {
        changes.push(format!("extra {}", added_names.join(", ")));
    }
    let description = changes.join("; ");

    let change_set: BTreeSet<(i64, String)> = req
        .removed_ingredient_ids
        .iter()
        .map(|i| (*i, "removed".to_string()))
        .chain(
            req.added_supplement_ids
                .iter()
                .map(|i| (*i, "added".to_string())),
        )
        .collect();
    let topping_ids: BTreeSet<i64> = toppings.keys().copied().collect();
    let existing = find_identical(&mut tx, base.id, price, &topping_ids, &change_set).await?;
    if let Some(existing) = existing {
        tracing::debug!(product_id = existing, base_pizza_id = base.id, "Custom pizza reused");
        return Ok(CustomPizzaCreated {
            product_id: existing,
            created: false,
            price,
        });
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let name = format!("{} (custom)", base.name);

    sqlx::query(
        "INSERT INTO product (id, kind, name, description, image, price, stock, volume_ml, alcohol_percent, is_spotlight, is_active, base_pizza_id, created_at, updated_at) VALUES (?1, 'pizza', ?2, ?3, ?4, ?5, 0, NULL, NULL, 0, 1, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&name)
    .bind(&description)
    .bind(&base.image)
    .bind(price)
    .bind(base.id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for ingredient_id in &topping_ids {
        sqlx::query("INSERT INTO pizza_ingredient (pizza_id, ingredient_id) VALUES (?1, ?2)")
            .bind(id)
            .bind(ingredient_id)
            .execute(&mut *tx)
            .await?;
    }

    for (ingredient_id, change) in &change_set {
        sqlx::query(
            "INSERT INTO custom_pizza_change (pizza_id, ingredient_id, change) VALUES (?1, ?2, ?3)",
        )
        .bind(id)
        .bind(ingredient_id)
        .bind(change)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        product_id = id,
        base_pizza_id = base.id,
        price,
        "Custom pizza created"
    );

    Ok(CustomPizzaCreated {
        product_id: id,
        created: true,
        price,
    })
}
