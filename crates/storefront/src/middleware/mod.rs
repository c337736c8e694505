//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! Vendor identity and tenant selection are checked per handler by the
//! extractors in [`auth`].

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireSelection, RequireVendor, clear_current_vendor, set_current_vendor};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
