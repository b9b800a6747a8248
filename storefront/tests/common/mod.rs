//! In-process test client over the full router
#![allow(dead_code)]

use std::sync::atomic::{AtomicU8, Ordering};

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use storefront::api::build_router;
use storefront::{Config, ServerState};

pub const ADMIN_EMAIL: &str = "admin@pizzeria.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

static NEXT_IP: AtomicU8 = AtomicU8::new(1);

/// One browser: its own session cookie, bearer token and client IP
#[derive(Clone)]
pub struct TestClient {
    router: Router,
    pub state: ServerState,
    cookie: Option<String>,
    token: Option<String>,
    ip: String,
}

pub async fn spawn_app() -> TestClient {
    spawn_app_with(Config::for_tests()).await
}

pub async fn spawn_app_with(config: Config) -> TestClient {
    let state = ServerState::initialize(&config)
        .await
        .expect("test state");
    TestClient {
        router: build_router(state.clone()),
        state,
        cookie: None,
        token: None,
        ip: next_ip(),
    }
}

fn next_ip() -> String {
    format!("10.0.0.{}", NEXT_IP.fetch_add(1, Ordering::Relaxed))
}

impl TestClient {
    /// Another browser on the same server
    pub fn new_client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            state: self.state.clone(),
            cookie: None,
            token: None,
            ip: next_ip(),
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", &self.ip);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("cookie header")
                .split(';')
                .next()
                .expect("cookie pair")
                .to_string();
            self.cookie = Some(pair);
        }

        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, json)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Register a customer and keep its token
    pub async fn register(&mut self, email: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/auth/register",
                serde_json::json!({
                    "email": email,
                    "password": "correct horse",
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        let token = body["data"]["token"].as_str().expect("token").to_string();
        self.set_token(token);
        body["data"]["user"].clone()
    }

    /// Log in as the bootstrapped admin
    pub async fn login_admin(&mut self) {
        let (status, body) = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        let token = body["data"]["token"].as_str().expect("token").to_string();
        self.set_token(token);
    }
}
