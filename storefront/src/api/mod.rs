//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness and detailed health checks
//! - [`products`] - public catalog
//! - [`cart`] - session cart and custom pizzas
//! - [`auth`] - registration, login, profile
//! - [`checkout`] - order creation from the cart
//! - [`orders`] - the customer's own orders
//! - [`admin`] - back-office (catalog, stock, orders)

pub mod health;

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

pub mod admin;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::session::session_layer;

/// Build the full application router.
///
/// Every `/api` route runs inside the session layer; `/health` does not.
pub fn build_router(state: ServerState) -> Router {
    let api = Router::new()
        .merge(products::router())
        .merge(cart::router())
        .merge(auth::router(state.clone()))
        .merge(checkout::router(state.clone()))
        .merge(orders::router(state.clone()))
        .merge(admin::router(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer));

    let mut app = Router::new()
        .merge(health::router())
        .merge(api)
        .layer(TraceLayer::new_for_http());

    if state.config.is_development() {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}
