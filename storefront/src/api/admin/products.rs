//! Catalog management handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::procedures;
use crate::db::repository::product;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::models::{Product, ProductCreate, ProductDetail, ProductUpdate, SpotlightUpdate};

fn check_texts(description: &Option<String>, image: &Option<String>) -> AppResult<()> {
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/admin/products - every catalog product, inactive included
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = product::list_all(state.pool()).await?;
    Ok(ok(products))
}

/// POST /api/admin/products - create a catalog product
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    check_texts(&payload.description, &payload.image)?;
    let detail = procedures::create_product(state.pool(), payload).await?;
    tracing::info!(
        operator = %user.email,
        product_id = detail.product.id,
        "Catalog product created"
    );
    Ok(ok(detail))
}

/// PUT /api/admin/products/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    check_texts(&payload.description, &payload.image)?;
    let detail = procedures::update_product(state.pool(), id, payload).await?;
    tracing::info!(operator = %user.email, product_id = id, "Catalog product updated");
    Ok(ok(detail))
}

/// DELETE /api/admin/products/{id} - take a product off sale
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !product::deactivate(state.pool(), id).await? {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {id} not found"),
        ));
    }
    tracing::info!(operator = %user.email, product_id = id, "Catalog product deactivated");
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/admin/products/{id}/spotlight - feature or unfeature a product
pub async fn set_spotlight(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SpotlightUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product::set_spotlight(state.pool(), id, payload.is_spotlight).await?;
    Ok(ok(product))
}
