//! Vendor authentication extractors.
//!
//! Vendor routes use [`RequireVendor`] for the logged-in identity and
//! [`RequireSelection`] when they also need the business being managed.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use marketstall_core::Business;

use crate::models::{CurrentVendor, session_keys};
use crate::services::{TenantError, TenantSelection};
use crate::state::AppState;

/// Extractor that requires a logged-in vendor.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireVendor(vendor): RequireVendor,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", vendor.email)
/// }
/// ```
pub struct RequireVendor(pub CurrentVendor);

/// Extractor that requires a logged-in vendor with a selected business.
///
/// Resolves the selection through [`TenantSelection::current_selection`], so
/// vendors with a single business never have to select it explicitly.
pub struct RequireSelection {
    pub vendor: CurrentVendor,
    pub business: Business,
}

/// Rejection from the vendor extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// No vendor in the session.
    Unauthorized,
    /// Vendor owns several businesses and has not picked one.
    SelectionRequired,
    /// The session or registry failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "login required").into_response(),
            Self::SelectionRequired => (StatusCode::CONFLICT, "selection required").into_response(),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

fn session_from(parts: &Parts) -> Result<Session, AuthRejection> {
    // Set by SessionManagerLayer
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::Internal)
}

async fn vendor_from(session: &Session) -> Result<CurrentVendor, AuthRejection> {
    session
        .get::<CurrentVendor>(session_keys::CURRENT_VENDOR)
        .await
        .ok()
        .flatten()
        .ok_or(AuthRejection::Unauthorized)
}

impl<S> FromRequestParts<S> for RequireVendor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;
        Ok(Self(vendor_from(&session).await?))
    }
}

impl FromRequestParts<AppState> for RequireSelection {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;
        let vendor = vendor_from(&session).await?;

        let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
        let business = match tenant.current_selection().await {
            Ok(Some(business)) => business,
            Ok(None) => return Err(AuthRejection::SelectionRequired),
            Err(e) => {
                log_tenant_failure(&e);
                return Err(AuthRejection::Internal);
            }
        };

        Ok(Self { vendor, business })
    }
}

fn log_tenant_failure(err: &TenantError) {
    let event_id = sentry::capture_error(err);
    tracing::error!(error = %err, sentry_event_id = %event_id, "Failed to resolve business selection");
}

/// Helper to set the current vendor in the session.
///
/// Cycles the session ID so a pre-login session cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_vendor(
    session: &Session,
    vendor: &CurrentVendor,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_VENDOR, vendor).await
}

/// Helper to clear the session on logout.
///
/// Removes the vendor and any business selection.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_vendor(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
