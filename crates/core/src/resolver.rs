//! Effective and draft views of a business.
//!
//! These are the only sanctioned read paths for customizable settings.
//! The public storefront renders [`resolve_effective`]; the vendor portal's
//! customization screens render [`resolve_draft`]. Neither exposes the raw
//! `draft`/`published` overlays.
//!
//! Both resolve each field independently: an override field replaces the
//! baseline field wholesale, nested keys are never merged. An absent business
//! is handled by mapping over the `Option`:
//!
//! ```
//! # use marketstall_core::{Business, resolve_effective};
//! let missing: Option<&Business> = None;
//! assert!(missing.map(resolve_effective).is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::business::{Business, Contact, Owner, SettingsOverride, Social, StoreSettings, Theme};
use crate::types::{BusinessId, Slug};

/// A business with its overrides applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBusiness {
    pub id: BusinessId,
    pub slug: Slug,
    pub owner: Owner,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub theme: Theme,
    pub contact: Contact,
    pub social: Social,
    pub settings: StoreSettings,
}

impl ResolvedBusiness {
    /// The baseline view, ignoring both overrides.
    #[must_use]
    pub fn baseline(business: &Business) -> Self {
        Self {
            id: business.id,
            slug: business.slug.clone(),
            owner: business.owner.clone(),
            name: business.name.clone(),
            logo: business.logo.clone(),
            description: business.description.clone(),
            theme: business.theme.clone(),
            contact: business.contact.clone(),
            social: business.social.clone(),
            settings: business.settings.clone(),
        }
    }

    fn overlay(business: &Business, over: &SettingsOverride) -> Self {
        Self {
            id: business.id,
            slug: business.slug.clone(),
            owner: business.owner.clone(),
            name: pick(over.name.as_ref(), &business.name),
            logo: pick(over.logo.as_ref(), &business.logo),
            description: pick(over.description.as_ref(), &business.description),
            theme: pick(over.theme.as_ref(), &business.theme),
            contact: pick(over.contact.as_ref(), &business.contact),
            social: pick(over.social.as_ref(), &business.social),
            settings: pick(over.settings.as_ref(), &business.settings),
        }
    }
}

fn pick<T: Clone>(over: Option<&T>, baseline: &T) -> T {
    over.unwrap_or(baseline).clone()
}

/// The public-facing view: published overrides over the baseline.
///
/// Only applies when the business is marked published and has a non-empty
/// published override; otherwise returns the baseline.
#[must_use]
pub fn resolve_effective(business: &Business) -> ResolvedBusiness {
    match &business.published {
        Some(published) if business.is_published && !published.is_empty() => {
            ResolvedBusiness::overlay(business, published)
        }
        _ => ResolvedBusiness::baseline(business),
    }
}

/// The vendor-facing editing view: draft overrides over the baseline.
#[must_use]
pub fn resolve_draft(business: &Business) -> ResolvedBusiness {
    match &business.draft {
        Some(draft) => ResolvedBusiness::overlay(business, draft),
        None => ResolvedBusiness::baseline(business),
    }
}
