//! Back-office API
//!
//! Every route needs a bearer token; each group checks its own permission.
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/admin/products | GET, POST | catalog:manage |
//! | /api/admin/products/{id} | PUT, DELETE | catalog:manage |
//! | /api/admin/products/{id}/spotlight | PUT | catalog:manage |
//! | /api/admin/ingredients | GET, POST | catalog:manage |
//! | /api/admin/stock | GET | stock:manage |
//! | /api/admin/stock/low?threshold= | GET | stock:manage |
//! | /api/admin/stock/{id} | PUT | stock:manage |
//! | /api/admin/stock/{id}/adjust | POST | stock:manage |
//! | /api/admin/orders?status= | GET | orders:manage |
//! | /api/admin/orders/{id} | GET | orders:manage |
//! | /api/admin/orders/{id}/status | PUT | orders:manage |

mod ingredients;
mod orders;
mod products;
mod stock;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{CATALOG_MANAGE, ORDERS_MANAGE, STOCK_MANAGE};
use crate::auth::{require_auth, require_permission};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .nest("/api/admin", routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn routes() -> Router<ServerState> {
    let catalog_routes = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/{id}", put(products::update).delete(products::delete))
        .route("/products/{id}/spotlight", put(products::set_spotlight))
        .route("/ingredients", get(ingredients::list).post(ingredients::create))
        .route_layer(middleware::from_fn(require_permission(CATALOG_MANAGE)));

    let stock_routes = Router::new()
        .route("/stock", get(stock::list))
        .route("/stock/low", get(stock::low))
        .route("/stock/{id}", put(stock::set))
        .route("/stock/{id}/adjust", post(stock::adjust))
        .route_layer(middleware::from_fn(require_permission(STOCK_MANAGE)));

    let order_routes = Router::new()
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::get_by_id))
        .route("/orders/{id}/status", put(orders::update_status))
        .route_layer(middleware::from_fn(require_permission(ORDERS_MANAGE)));

    catalog_routes.merge(stock_routes).merge(order_routes)
}
