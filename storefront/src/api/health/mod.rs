//! Health check routes
//!
//! # Routes
//!
//! | Path | Method | Description | Auth |
//! |------|--------|-------------|------|
//! | /health | GET | liveness | none |
//! | /health/detailed | GET | database, sessions, uptime | none |
//!
//! Both answer plain JSON (no response envelope) so load balancers can read
//! `status` directly.
//!
//! ```json
//! { "status": "ok", "version": "0.1.0" }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: i64,
    environment: String,
    /// Live cart sessions
    active_sessions: usize,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

/// Single component check
#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/detailed
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let database = check_database(&state).await;
    let status = if database.status == "ok" { "ok" } else { "error" };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        environment: state.config.environment.clone(),
        active_sessions: state.sessions.len(),
        checks: HealthChecks { database },
    })
}

async fn check_database(state: &ServerState) -> CheckResult {
    let start = Instant::now();
    let healthy = state.db.ping().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    if healthy {
        CheckResult {
            status: "ok",
            latency_ms,
            message: None,
        }
    } else {
        tracing::warn!(latency_ms, "Database health check failed");
        CheckResult {
            status: "error",
            latency_ms,
            message: Some("database did not answer".to_string()),
        }
    }
}
