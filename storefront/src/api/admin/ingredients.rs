//! Ingredient management handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::ingredient;
use crate::utils::{ApiResponse, AppResult, ok};
use shared::models::{Ingredient, IngredientCreate};

/// GET /api/admin/ingredients - every ingredient, supplements included
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Ingredient>>>> {
    let ingredients = ingredient::find_all(state.pool()).await?;
    Ok(ok(ingredients))
}

/// POST /api/admin/ingredients
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let created = ingredient::create(state.pool(), payload).await?;
    tracing::info!(ingredient_id = created.id, name = %created.name, "Ingredient created");
    Ok(ok(created))
}
