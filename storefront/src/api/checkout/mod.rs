//! Checkout API
//!
//! POST /api/checkout turns the session cart into an order for the signed-in
//! customer.

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/checkout", post(handler::checkout))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
