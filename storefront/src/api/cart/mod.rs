//! Session cart API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/cart | GET | cart resolved against the catalog |
//! | /api/cart | DELETE | empty the cart |
//! | /api/cart/items | POST | add a product |
//! | /api/cart/items/{kind}/{id} | PUT | set a line quantity |
//! | /api/cart/items/{kind}/{id} | DELETE | remove a line |
//! | /api/cart/custom-pizza | POST | derive a pizza and add it |
//!
//! Every route answers with the updated cart view.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view).delete(handler::clear))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{kind}/{id}",
            put(handler::update_item).delete(handler::remove_item),
        )
        .route("/custom-pizza", post(handler::add_custom_pizza))
}
