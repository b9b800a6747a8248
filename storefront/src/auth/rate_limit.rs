//! Rate limiting for login and registration routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Login: 5 requests per minute per IP
pub const LOGIN_LIMIT: (u32, u64) = (5, 60);
/// Registration: 3 requests per minute per IP
pub const REGISTER_LIMIT: (u32, u64) = (3, 60);

/// Windows idle longer than this are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window counters keyed by `(route, ip)`
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<DashMap<(&'static str, String), Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request; `false` once `max_requests` is exceeded in the window
    pub fn check(&self, route: &'static str, ip: &str, max_requests: u32, window_secs: u64) -> bool {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry((route, ip.to_owned()))
            .or_insert(Window {
                count: 0,
                started: now,
            });

        if now.duration_since(window.started) >= Duration::from_secs(window_secs) {
            window.count = 0;
            window.started = now;
        }
        window.count += 1;
        window.count <= max_requests
    }

    pub fn cleanup(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started) < STALE_AFTER);
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Client IP used as the limiter key.
///
/// The first `X-Forwarded-For` entry counts only behind a trusted proxy;
/// otherwise any client could pick a fresh key per request.
fn extract_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    state: &ServerState,
    route: &'static str,
    (max_requests, window_secs): (u32, u64),
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.config.trust_proxy);
    if !state.rate_limiter.check(route, &ip, max_requests, window_secs) {
        security_log!("WARN", "rate_limited", route = route, ip = ip);
        return Err(AppError::with_message(
            ErrorCode::TooManyRequests,
            "Too many requests, try again later",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state, "login", LOGIN_LIMIT, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state, "register", REGISTER_LIMIT, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_route_and_ip() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("register", "10.0.0.1", 3, 60));
        }
        assert!(!limiter.check("register", "10.0.0.1", 3, 60));

        // other IP and other route are counted separately
        assert!(limiter.check("register", "10.0.0.2", 3, 60));
        assert!(limiter.check("login", "10.0.0.1", 5, 60));
        assert_eq!(limiter.len(), 3);
    }

    fn request_from(forwarded: &str, peer: Option<&str>) -> Request {
        let mut request = http::Request::builder()
            .header("x-forwarded-for", forwarded)
            .body(axum::body::Body::empty())
            .unwrap();
        if let Some(peer) = peer {
            let addr: std::net::SocketAddr = peer.parse().unwrap();
            request
                .extensions_mut()
                .insert(axum::extract::ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn test_forwarded_header_needs_trusted_proxy() {
        let request = request_from("203.0.113.7, 10.0.0.1", Some("192.0.2.1:40000"));
        assert_eq!(extract_ip(&request, true), "203.0.113.7");
        assert_eq!(extract_ip(&request, false), "192.0.2.1");

        let request = request_from("203.0.113.7", None);
        assert_eq!(extract_ip(&request, false), "unknown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("login", "10.0.0.1", 1, 60));
        assert!(!limiter.check("login", "10.0.0.1", 1, 60));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check("login", "10.0.0.1", 1, 60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_windows() {
        let limiter = RateLimiter::new();
        limiter.check("login", "10.0.0.1", 5, 60);
        tokio::time::advance(Duration::from_secs(120)).await;
        limiter.check("login", "10.0.0.2", 5, 60);
        tokio::time::advance(Duration::from_secs(200)).await;

        limiter.cleanup();
        assert_eq!(limiter.len(), 1);
    }
}
