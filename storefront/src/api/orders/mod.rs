//! Customer order history
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | GET | own orders, newest first |
//! | /api/orders/{id} | GET | own order with lines |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}
