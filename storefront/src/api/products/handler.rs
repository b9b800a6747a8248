//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{ingredient, product};
use crate::utils::validation::parse_kind;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::models::{Ingredient, Product, ProductDetail};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub kind: Option<String>,
}

/// GET /api/products?kind=pizza - active catalog
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;
    let products = product::list_catalog(state.pool(), kind).await?;
    Ok(ok(products))
}

/// GET /api/products/spotlight - featured products
pub async fn list_spotlight(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = product::list_spotlight(state.pool()).await?;
    Ok(ok(products))
}

/// GET /api/products/{id} - product detail
///
/// Custom pizzas are reachable here so a cart can show them; deactivated
/// products are not.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let detail = product::find_detail(state.pool(), id)
        .await?
        .filter(|d| d.product.is_active)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        })?;
    Ok(ok(detail))
}

/// GET /api/supplements - ingredients a customer may add to a pizza
pub async fn list_supplements(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Ingredient>>>> {
    let supplements = ingredient::find_supplements(state.pool()).await?;
    Ok(ok(supplements))
}
