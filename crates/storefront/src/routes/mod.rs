//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Health check
//!
//! # Public storefront
//! GET    /stores/{slug}         - Effective (published) view of a business
//!
//! # Demo vendor auth
//! POST   /auth/login            - Log in as the owner of one or more businesses
//! POST   /auth/logout           - Log out
//!
//! # Vendor portal (requires login)
//! GET    /vendor/businesses     - Owned businesses and picker flag
//! GET    /vendor/selection      - Business being managed (204 when none)
//! POST   /vendor/selection      - Select a business
//! DELETE /vendor/selection      - Clear the selection
//!
//! # Vendor editing (requires login and a selection)
//! GET    /vendor/draft          - Draft view
//! PATCH  /vendor/draft          - Merge changes into the draft
//! DELETE /vendor/draft          - Discard the draft
//! POST   /vendor/publish        - Publish the draft
//! ```
//!
//! Editing routes accept `If-Match: "<version>"` and answer with
//! `ETag: "<version>"`.

pub mod auth;
pub mod storefront;
pub mod vendor;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the vendor portal routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/businesses", get(vendor::businesses))
        .route(
            "/selection",
            get(vendor::current_selection)
                .post(vendor::select_business)
                .delete(vendor::clear_selection),
        )
        .route(
            "/draft",
            get(vendor::draft)
                .patch(vendor::update_draft)
                .delete(vendor::discard_draft),
        )
        .route("/publish", post(vendor::publish))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores/{slug}", get(storefront::show))
        .nest("/auth", auth_routes())
        .nest("/vendor", vendor_routes())
}
