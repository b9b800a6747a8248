//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::cart::view::resolve_session;
use crate::core::ServerState;
use crate::db::procedures;
use crate::db::repository::product;
use crate::session::Session;
use crate::utils::validation::parse_kind;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};
use shared::models::{
    CartItemAdd, CartQuantityUpdate, CartView, CustomPizzaCreated, CustomPizzaRequest, ProductKind,
};

/// Custom pizza added to the cart
#[derive(Debug, Serialize)]
pub struct CustomPizzaAdded {
    pub pizza: CustomPizzaCreated,
    pub cart: CartView,
}

async fn current_view(state: &ServerState, session: &Session) -> AppResult<CartView> {
    Ok(resolve_session(state.pool(), session).await?.view)
}

/// Product must exist, be on sale and be filed under `kind`
async fn ensure_addable(state: &ServerState, kind: ProductKind, id: i64) -> AppResult<()> {
    let product = product::find_by_id(state.pool(), id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        })?;
    if product.kind != kind {
        return Err(AppError::with_message(
            ErrorCode::ProductKindMismatch,
            format!("Product {id} is a {}, not a {kind}", product.kind),
        ));
    }
    Ok(())
}

/// GET /api/cart - current cart
pub async fn view(
    State(state): State<ServerState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(ok(current_view(&state, &session).await?))
}

/// POST /api/cart/items - add a product
pub async fn add_item(
    State(state): State<ServerState>,
    session: Session,
    Json(payload): Json<CartItemAdd>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    ensure_addable(&state, payload.kind, payload.product_id).await?;
    let quantity = session
        .update_cart(|cart| cart.add(payload.kind, payload.product_id, payload.quantity))??;
    tracing::debug!(
        session = %session.id(),
        kind = %payload.kind,
        product_id = payload.product_id,
        quantity,
        "Cart line added"
    );
    Ok(ok(current_view(&state, &session).await?))
}

/// PUT /api/cart/items/{kind}/{id} - set a line quantity
pub async fn update_item(
    State(state): State<ServerState>,
    session: Session,
    Path((kind, id)): Path<(String, i64)>,
    Json(payload): Json<CartQuantityUpdate>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let kind = parse_kind(&kind)?;
    session.update_cart(|cart| cart.update_quantity(kind, id, payload.quantity))??;
    Ok(ok(current_view(&state, &session).await?))
}

/// DELETE /api/cart/items/{kind}/{id} - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    session: Session,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let kind = parse_kind(&kind)?;
    session.update_cart(|cart| cart.remove(kind, id))??;
    Ok(ok(current_view(&state, &session).await?))
}

/// DELETE /api/cart - empty the cart
pub async fn clear(session: Session) -> AppResult<Json<ApiResponse<CartView>>> {
    session.update_cart(|cart| cart.clear())?;
    Ok(ok(CartView::default()))
}

/// POST /api/cart/custom-pizza - derive a pizza from a catalog pizza and add it
///
/// An unchanged request adds the base pizza itself.
pub async fn add_custom_pizza(
    State(state): State<ServerState>,
    session: Session,
    Json(payload): Json<CustomPizzaRequest>,
) -> AppResult<Json<ApiResponse<CustomPizzaAdded>>> {
    let quantity = payload.quantity.unwrap_or(1);
    crate::cart::check_quantity(quantity)?;

    let pizza = procedures::create_custom_pizza(state.pool(), &payload).await?;
    session.update_cart(|cart| cart.add(ProductKind::Pizza, pizza.product_id, quantity))??;

    let cart = current_view(&state, &session).await?;
    Ok(ok(CustomPizzaAdded { pizza, cart }))
}
