//! Business inspection commands.
//!
//! These load the registry the same way the storefront does, then log what
//! they find as structured events or pretty JSON.

use std::path::PathBuf;

use tracing::info;

use marketstall_core::{Email, Slug};
use marketstall_storefront::config::StorefrontConfig;
use marketstall_storefront::state::AppState;

use crate::View;

/// Load application state, preferring `seed` over the configured seed file.
fn load_state(seed: Option<PathBuf>) -> Result<AppState, Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if seed.is_some() {
        config.seed_file = seed;
    }
    Ok(AppState::from_config(config)?)
}

/// List every business with its lifecycle state.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded.
pub fn list(seed: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let state = load_state(seed)?;
    let businesses = state.registry().all()?;

    info!(count = businesses.len(), "Businesses");
    for business in &businesses {
        info!(
            id = %business.id,
            slug = %business.slug,
            owner = %business.owner.email,
            lifecycle = %business.lifecycle(),
            version = business.version,
            "{}",
            business.name
        );
    }
    Ok(())
}

/// Log the resolved settings of the business at `slug` as JSON.
///
/// # Errors
///
/// Returns an error if the slug is malformed, no business has it, or the
/// registry cannot be loaded.
pub async fn show(
    slug: &str,
    view: View,
    seed: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let slug = Slug::parse(slug)?;
    let state = load_state(seed)?;

    let resolved = match view {
        View::Effective => state.views().effective_by_slug(&slug).await?,
        View::Draft => match state.registry().get_by_slug(&slug)? {
            Some(business) => state.views().draft_for(business.id)?,
            None => None,
        },
    };
    let resolved = resolved.ok_or_else(|| format!("No business with slug {slug}"))?;

    info!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

/// List businesses owned by `email`.
///
/// # Errors
///
/// Returns an error if the email is malformed or the registry cannot be
/// loaded.
pub fn owned(email: &str, seed: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let state = load_state(seed)?;
    let businesses = state.registry().businesses_for_owner(&email)?;

    if businesses.is_empty() {
        info!(owner = %email, "No businesses for this owner");
        return Ok(());
    }

    info!(owner = %email, count = businesses.len(), "Owned businesses");
    for business in &businesses {
        info!(
            id = %business.id,
            slug = %business.slug,
            lifecycle = %business.lifecycle(),
            "{}",
            business.name
        );
    }
    Ok(())
}
