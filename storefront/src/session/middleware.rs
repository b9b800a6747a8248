//! Session cookie middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;

use super::Session;
use crate::core::ServerState;

pub const SESSION_COOKIE: &str = "pizzeria_session";

/// Session id from the `Cookie` header(s), if well-formed
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(id: Uuid, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Load the caller's session or start a new one, and expose it to handlers
/// as a [`Session`] extension.
pub async fn session_layer(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let store = state.sessions.clone();
    let existing = session_id_from_headers(req.headers()).filter(|id| store.touch(id));
    let (id, created) = match existing {
        Some(id) => (id, false),
        None => (store.create(), true),
    };

    req.extensions_mut().insert(Session::new(id, store));
    let mut response = next.run(req).await;

    if created {
        tracing::debug!(session_id = %id, "Session started");
        match HeaderValue::from_str(&session_cookie(id, state.config.is_production())) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode session cookie"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=it")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_malformed_or_missing_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("pizzeria_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id, false);
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
        assert!(session_cookie(id, true).ends_with("; Secure"));
    }
}
