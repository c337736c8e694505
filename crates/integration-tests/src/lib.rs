//! Integration tests for Marketstall.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketstall-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `draft_publish` - lifecycle and resolver properties across crates
//! - `storefront_http` - public routes through the full router
//! - `vendor_http` - demo login, tenant selection and editing over HTTP
//!
//! HTTP tests drive the axum router in-process with
//! [`tower::ServiceExt::oneshot`]; no sockets are opened.

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use marketstall_storefront::config::StorefrontConfig;
use marketstall_storefront::registry::InMemoryRegistry;
use marketstall_storefront::state::AppState;

/// Owns green-leaf-market and harbor-books in the demo seed.
pub const MAYA: &str = "maya@greenleaf.example";
/// Owns copper-kettle-coffee in the demo seed.
pub const JONAS: &str = "jonas@copperkettle.example";

/// Application state over a fresh copy of the demo businesses.
#[must_use]
pub fn demo_state() -> AppState {
    let registry = InMemoryRegistry::demo().expect("demo seed loads");
    AppState::new(StorefrontConfig::default(), Arc::new(registry))
}

/// A response with its body decoded as JSON (`Value::Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    /// The version carried in the `ETag` header.
    #[must_use]
    pub fn etag_version(&self) -> Option<u64> {
        self.headers
            .get(header::ETAG)?
            .to_str()
            .ok()?
            .trim_matches('"')
            .parse()
            .ok()
    }
}

/// A browser-like client that keeps the session cookie between requests.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Create a client over the full application router.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            app: marketstall_storefront::app(state),
            cookie: None,
        }
    }

    /// A second client sharing the same application but not the cookie.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&mut self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, body, &[]).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, &[]).await
    }

    /// Log in through the demo auth route.
    pub async fn login(&mut self, email: &str) -> TestResponse {
        self.post("/auth/login", Some(serde_json::json!({ "email": email })))
            .await
    }

    /// Send a request, carrying and updating the session cookie.
    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            self.cookie = if set_cookie.contains("Max-Age=0") {
                None
            } else {
                set_cookie.split(';').next().map(str::to_string)
            };
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }
}
