//! Demo vendor authentication.
//!
//! Logging in only asks for an email address. Any address that owns at least
//! one business is accepted.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marketstall_core::Email;

use super::vendor::BusinessSummary;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_vendor, set_current_vendor};
use crate::models::CurrentVendor;
use crate::services::TenantSelection;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub name: String,
    pub email: Email,
    pub businesses: Vec<BusinessSummary>,
    /// Whether the vendor must pick a business before editing.
    pub picker_required: bool,
}

/// Log in as a vendor.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a malformed email and
/// `AppError::Unauthorized` if the address owns no business.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = Email::parse(&req.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let owned = state.registry().businesses_for_owner(&email)?;
    let Some(first) = owned.first() else {
        tracing::warn!(email = %email, "Login attempt for address with no businesses");
        return Err(AppError::Unauthorized("no businesses for this address".to_string()));
    };

    let vendor = CurrentVendor {
        name: first.owner.name.clone(),
        email,
    };
    set_current_vendor(&session, &vendor).await?;
    set_sentry_user(&vendor.email, Some(vendor.email.as_str()));

    let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
    let picker_required = tenant.picker_required().await?;

    tracing::info!(email = %vendor.email, businesses = owned.len(), "Vendor logged in");

    Ok(Json(LoginResponse {
        name: vendor.name,
        email: vendor.email,
        businesses: owned.iter().map(BusinessSummary::from).collect(),
        picker_required,
    }))
}

/// Log out.
///
/// POST /auth/logout
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be cleared.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_vendor(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
