//! In-memory session store

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::cart::Cart;

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub cart: Cart,
    pub created_at: i64,
    pub last_seen: i64,
}

/// Sessions keyed by the opaque id carried in the session cookie.
///
/// Cheap to clone; all clones share one map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionData>>,
    ttl_ms: i64,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl_ms: ttl_minutes * 60_000,
        }
    }

    /// Start an empty session
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = shared::util::now_millis();
        self.sessions.insert(
            id,
            SessionData {
                cart: Cart::new(),
                created_at: now,
                last_seen: now,
            },
        );
        id
    }

    /// Refresh `last_seen` of a live session.
    ///
    /// Returns `false` for unknown ids and for expired sessions, which are
    /// dropped on the spot.
    pub fn touch(&self, id: &Uuid) -> bool {
        let now = shared::util::now_millis();
        let Some(mut data) = self.sessions.get_mut(id) else {
            return false;
        };
        if now - data.last_seen <= self.ttl_ms {
            data.last_seen = now;
            return true;
        }
        // release the shard lock before removing
        drop(data);
        self.sessions.remove(id);
        false
    }

    /// Snapshot of the cart (empty for unknown sessions)
    pub fn cart(&self, id: &Uuid) -> Cart {
        self.sessions
            .get(id)
            .map(|data| data.cart.clone())
            .unwrap_or_default()
    }

    /// Run `f` on the cart; `None` when the session is gone
    pub fn with_cart<R>(&self, id: &Uuid, f: impl FnOnce(&mut Cart) -> R) -> Option<R> {
        self.sessions.get_mut(id).map(|mut data| f(&mut data.cart))
    }

    /// Drop idle sessions; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let cutoff = shared::util::now_millis() - self.ttl_ms;
        let before = self.sessions.len();
        self.sessions.retain(|_, data| data.last_seen >= cutoff);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn age(&self, id: &Uuid, millis: i64) {
        if let Some(mut data) = self.sessions.get_mut(id) {
            data.last_seen -= millis;
        }
    }
}
