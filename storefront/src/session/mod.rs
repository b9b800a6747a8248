//! Server-side sessions
//!
//! The browser only holds an opaque id in the `pizzeria_session` cookie; the
//! cart lives in [`SessionStore`].

pub mod middleware;
pub mod store;

pub use middleware::{SESSION_COOKIE, session_layer};
pub use store::{SessionData, SessionStore};

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::cart::Cart;
use crate::utils::AppError;

/// Handle on the caller's session, injected by [`session_layer`]
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    store: SessionStore,
}

impl Session {
    pub fn new(id: Uuid, store: SessionStore) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the cart
    pub fn cart(&self) -> Cart {
        self.store.cart(&self.id)
    }

    /// Mutate the cart in place
    pub fn update_cart<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> Result<R, AppError> {
        self.store
            .with_cart(&self.id, f)
            .ok_or_else(|| AppError::invalid("Session expired, reload the page"))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session layer not installed"))
    }
}
