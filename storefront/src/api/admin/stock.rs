//! Stock management handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::stock;
use crate::utils::{ApiResponse, AppError, AppResult, ok};
use shared::models::{StockAdjust, StockEntry, StockSet};

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i64>,
}

/// GET /api/admin/stock - stock and units sold per product
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<StockEntry>>>> {
    let entries = stock::find_all(state.pool()).await?;
    Ok(ok(entries))
}

/// GET /api/admin/stock/low?threshold=5 - active products at or below the threshold
///
/// Without `threshold` the configured `LOW_STOCK_THRESHOLD` applies.
pub async fn low(
    State(state): State<ServerState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<Vec<StockEntry>>>> {
    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    if threshold < 0 {
        return Err(AppError::validation("threshold must not be negative")
            .with_detail("threshold", threshold));
    }
    let entries = stock::find_low(state.pool(), threshold).await?;
    Ok(ok(entries))
}

/// PUT /api/admin/stock/{id} - set an absolute level
pub async fn set(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StockSet>,
) -> AppResult<Json<ApiResponse<StockEntry>>> {
    let entry = stock::set(state.pool(), id, payload.quantity).await?;
    tracing::info!(
        operator = %user.email,
        product_id = id,
        stock = entry.stock,
        "Stock set"
    );
    Ok(ok(entry))
}

/// POST /api/admin/stock/{id}/adjust - apply a delta; the result may not go negative
pub async fn adjust(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjust>,
) -> AppResult<Json<ApiResponse<StockEntry>>> {
    let entry = stock::adjust(state.pool(), id, payload.delta).await?;
    tracing::info!(
        operator = %user.email,
        product_id = id,
        delta = payload.delta,
        stock = entry.stock,
        "Stock adjusted"
    );
    Ok(ok(entry))
}
