//! Customer Order Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::models::{Order, OrderDetail};

/// GET /api/orders - orders of the signed-in customer
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = order::find_by_user(state.pool(), user.id).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id} - one order; other customers' orders are not found
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = order::find_detail_for_user(state.pool(), id, user.id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    Ok(ok(detail))
}
