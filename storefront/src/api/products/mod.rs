//! Public catalog API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/products?kind= | GET | active catalog, optionally one kind |
//! | /api/products/spotlight | GET | home page selection |
//! | /api/products/{id} | GET | product with ingredients |
//! | /api/supplements | GET | pizza supplement allow-list |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products", routes())
        .route("/api/supplements", get(handler::list_supplements))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/spotlight", get(handler::list_spotlight))
        .route("/{id}", get(handler::get_by_id))
}
