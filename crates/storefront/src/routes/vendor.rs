//! Vendor portal route handlers.

use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use marketstall_core::{
    Business, BusinessId, LifecycleState, ResolvedBusiness, SettingsOverride, Slug,
    resolve_effective,
};

use crate::error::{AppError, Result};
use crate::middleware::{RequireSelection, RequireVendor};
use crate::services::TenantSelection;
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// A business as listed in the vendor portal.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSummary {
    pub id: BusinessId,
    pub slug: Slug,
    pub name: String,
    pub lifecycle: LifecycleState,
    pub version: u64,
}

impl From<&Business> for BusinessSummary {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id,
            slug: business.slug.clone(),
            name: business.name.clone(),
            lifecycle: business.lifecycle(),
            version: business.version,
        }
    }
}

/// Owned businesses and the picker flag.
#[derive(Debug, Serialize)]
pub struct BusinessesResponse {
    pub businesses: Vec<BusinessSummary>,
    pub selected: Option<BusinessId>,
    pub picker_required: bool,
}

/// Request to select a business.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub business_id: BusinessId,
}

/// The editing view of the selected business.
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub business: BusinessSummary,
    pub has_pending_draft: bool,
    pub draft_updated_at: Option<DateTime<Utc>>,
    pub view: ResolvedBusiness,
}

/// Result of a publish request.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// False when there was no pending draft.
    pub published: bool,
    pub business: BusinessSummary,
    pub published_at: Option<DateTime<Utc>>,
    pub view: ResolvedBusiness,
}

// =============================================================================
// Versioning Headers
// =============================================================================

/// Expected business version from an `If-Match` header.
///
/// Accepts `"3"`, `W/"3"` and bare `3`. A missing header or `*` means last
/// write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfMatch(pub Option<u64>);

impl<S> FromRequestParts<S> for IfMatch
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parse_if_match(&parts.headers).map(Self)
    }
}

fn parse_if_match(headers: &HeaderMap) -> Result<Option<u64>> {
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::BadRequest("If-Match must be ASCII".to_string()))?
        .trim();
    if raw == "*" {
        return Ok(None);
    }

    let tag = raw.strip_prefix("W/").unwrap_or(raw);
    let tag = tag
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(tag);

    tag.parse::<u64>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("If-Match is not a version: {raw}")))
}

/// Attach `ETag: "<version>"` to a JSON body.
fn versioned<T: Serialize>(version: u64, body: T) -> Response {
    ([(header::ETAG, format!("\"{version}\""))], Json(body)).into_response()
}

fn draft_response(state: &AppState, business: &Business) -> Result<Response> {
    let view = state
        .views()
        .draft_for(business.id)?
        .ok_or_else(|| AppError::NotFound(business.slug.to_string()))?;

    Ok(versioned(
        business.version,
        DraftResponse {
            business: business.into(),
            has_pending_draft: business.has_pending_draft(),
            draft_updated_at: business.draft_updated_at,
            view,
        },
    ))
}

// =============================================================================
// Tenant Selection
// =============================================================================

/// Owned businesses and whether the picker must be shown.
///
/// GET /vendor/businesses
///
/// # Errors
///
/// Returns `AppError` if the registry or session fails.
#[instrument(skip_all, fields(vendor = %vendor.email))]
pub async fn businesses(
    State(state): State<AppState>,
    session: Session,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<BusinessesResponse>> {
    let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
    let owned = tenant.owned_businesses()?;
    let selected = tenant.current_selection().await?.map(|b| b.id);
    let picker_required = tenant.picker_required().await?;

    Ok(Json(BusinessesResponse {
        businesses: owned.iter().map(BusinessSummary::from).collect(),
        selected,
        picker_required,
    }))
}

/// The business being managed.
///
/// GET /vendor/selection
///
/// Answers 204 when nothing is selected.
///
/// # Errors
///
/// Returns `AppError` if the registry or session fails.
#[instrument(skip_all, fields(vendor = %vendor.email))]
pub async fn current_selection(
    State(state): State<AppState>,
    session: Session,
    RequireVendor(vendor): RequireVendor,
) -> Result<Response> {
    let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
    Ok(match tenant.current_selection().await? {
        Some(business) => Json(BusinessSummary::from(&business)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Select the business to manage.
///
/// POST /vendor/selection
///
/// # Errors
///
/// Returns `AppError::Tenant` when the business is unknown (404) or owned by
/// another vendor (403).
#[instrument(skip_all, fields(vendor = %vendor.email, business_id = %req.business_id))]
pub async fn select_business(
    State(state): State<AppState>,
    session: Session,
    RequireVendor(vendor): RequireVendor,
    Json(req): Json<SelectRequest>,
) -> Result<Json<BusinessSummary>> {
    let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
    let business = tenant.select_business(req.business_id).await?;
    Ok(Json(BusinessSummary::from(&business)))
}

/// Forget the selection.
///
/// DELETE /vendor/selection
///
/// # Errors
///
/// Returns `AppError` if the session fails.
#[instrument(skip_all, fields(vendor = %vendor.email))]
pub async fn clear_selection(
    State(state): State<AppState>,
    session: Session,
    RequireVendor(vendor): RequireVendor,
) -> Result<StatusCode> {
    let tenant = TenantSelection::new(&session, state.registry(), &vendor.email);
    tenant.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Draft / Publish
// =============================================================================

/// Draft view of the selected business.
///
/// GET /vendor/draft
///
/// # Errors
///
/// Returns `AppError` if the registry fails.
#[instrument(skip_all, fields(business_id = %business.id))]
pub async fn draft(
    State(state): State<AppState>,
    RequireSelection { business, .. }: RequireSelection,
) -> Result<Response> {
    draft_response(&state, &business)
}

/// Merge changes into the draft.
///
/// PATCH /vendor/draft
///
/// # Errors
///
/// Returns `AppError::Registry` with 409 for a stale `If-Match`.
#[instrument(skip_all, fields(business_id = %business.id))]
pub async fn update_draft(
    State(state): State<AppState>,
    RequireSelection { vendor, business }: RequireSelection,
    IfMatch(expected): IfMatch,
    Json(patch): Json<SettingsOverride>,
) -> Result<Response> {
    let business = state
        .publishing()
        .update_draft(business.id, patch, expected)?;
    tracing::debug!(vendor = %vendor.email, business_id = %business.id, "Vendor edited draft");
    draft_response(&state, &business)
}

/// Discard the draft.
///
/// DELETE /vendor/draft
///
/// # Errors
///
/// Returns `AppError::Registry` with 409 for a stale `If-Match`.
#[instrument(skip_all, fields(business_id = %business.id))]
pub async fn discard_draft(
    State(state): State<AppState>,
    RequireSelection { business, .. }: RequireSelection,
    IfMatch(expected): IfMatch,
) -> Result<Response> {
    let business = state.publishing().discard_draft(business.id, expected)?;
    draft_response(&state, &business)
}

/// Publish the draft.
///
/// POST /vendor/publish
///
/// Without a pending draft this succeeds with `"published": false`.
///
/// # Errors
///
/// Returns `AppError::Registry` with 409 for a stale `If-Match`.
#[instrument(skip_all, fields(business_id = %business.id))]
pub async fn publish(
    State(state): State<AppState>,
    RequireSelection { business, .. }: RequireSelection,
    IfMatch(expected): IfMatch,
) -> Result<Response> {
    let outcome = state.publishing().publish(business.id, expected).await?;
    let published = outcome.is_published();
    let business = outcome.into_business();

    Ok(versioned(
        business.version,
        PublishResponse {
            published,
            business: (&business).into(),
            published_at: business.published_at,
            view: resolve_effective(&business),
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn if_match(value: &str) -> Result<Option<u64>> {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MATCH, HeaderValue::from_str(value).unwrap());
        parse_if_match(&headers)
    }

    #[test]
    fn test_if_match_forms() {
        assert_eq!(parse_if_match(&HeaderMap::new()).unwrap(), None);
        assert_eq!(if_match("\"3\"").unwrap(), Some(3));
        assert_eq!(if_match("W/\"4\"").unwrap(), Some(4));
        assert_eq!(if_match(" 5 ").unwrap(), Some(5));
        assert_eq!(if_match("*").unwrap(), None);
    }

    #[test]
    fn test_if_match_rejects_garbage() {
        assert!(matches!(if_match("\"abc\""), Err(AppError::BadRequest(_))));
        assert!(matches!(if_match("-1"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_versioned_sets_etag() {
        let response = versioned(7, serde_json::json!({}));
        assert_eq!(response.headers().get(header::ETAG).unwrap(), "\"7\"");
    }
}
