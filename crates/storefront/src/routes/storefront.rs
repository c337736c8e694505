//! Public storefront route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use marketstall_core::{ResolvedBusiness, Slug};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Public view of a business.
///
/// GET /stores/{slug}
///
/// Serves only the effective settings. Drafts never leak here.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown or malformed slugs.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ResolvedBusiness>> {
    // A malformed slug cannot name a business
    let slug = Slug::parse(&slug).map_err(|_| AppError::NotFound(slug.clone()))?;

    state
        .views()
        .effective_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(slug.to_string()))
}
