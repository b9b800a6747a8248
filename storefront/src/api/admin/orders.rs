//! Order management handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::procedures;
use crate::db::repository::order;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::models::{Order, OrderDetail, OrderStatus, OrderStatusUpdate, OrderSummary};

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/admin/orders?status=paid - order summaries, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderSummary>>>> {
    let orders = order::find_summaries(state.pool(), query.status).await?;
    Ok(ok(orders))
}

/// GET /api/admin/orders/{id} - any order with its lines
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = order::find_detail(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
    })?;
    Ok(ok(detail))
}

/// PUT /api/admin/orders/{id}/status - move an order along its lifecycle
///
/// Cancelling puts the ordered units back in stock.
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = procedures::update_status(state.pool(), id, payload.status).await?;
    tracing::info!(
        operator = %user.email,
        order_id = id,
        status = %order.status,
        "Order status updated"
    );
    Ok(ok(order))
}
