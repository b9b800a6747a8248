//! Authentication Routes
//!
//! - /api/auth/register, /api/auth/login: public, rate limited per IP
//! - /api/auth/me: bearer token required

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route(
            "/api/auth/register",
            post(handler::register)
                .layer(middleware::from_fn_with_state(state.clone(), register_rate_limit)),
        )
        .route(
            "/api/auth/login",
            post(handler::login)
                .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit)),
        );

    let protected = Router::new()
        .route("/api/auth/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}
