//! Tenant business records.
//!
//! A [`Business`] carries three layers of customizable settings:
//!
//! - the **baseline** fields, always present
//! - an optional **draft** override, authored in the vendor portal
//! - an optional **published** override, served by the public storefront
//!
//! Overrides are [`SettingsOverride`] values. They replace baseline fields at
//! field-object granularity: an override `theme` replaces the whole baseline
//! `theme`, even when some of its own keys are unset. Reading the layered
//! result goes through [`crate::resolver`]; the transition helpers at the
//! bottom of this module are the only code that moves data between layers.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BusinessId, Email, Slug};

/// The vendor who owns a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Display name.
    pub name: String,
    /// Identity used for ownership lookups.
    pub email: Email,
}

/// Storefront color scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl Theme {
    /// Create a theme with all three colors set.
    #[must_use]
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        accent: impl Into<String>,
    ) -> Self {
        Self {
            primary: Some(primary.into()),
            secondary: Some(secondary.into()),
            accent: Some(accent.into()),
        }
    }
}

/// Public contact details for a business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Contact {
    /// Create a contact block with all fields set.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            phone: Some(phone.into()),
            address: Some(address.into()),
        }
    }
}

/// Social profile links, one per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

/// A storefront navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    /// Create a navigation link.
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Storefront copy and navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    /// Ordered navigation links.
    #[serde(default)]
    pub nav_links: Vec<NavLink>,
}

/// A partial set of business settings, used for both drafts and published
/// overrides.
///
/// Every field is independent. A present field replaces the corresponding
/// baseline field as a whole; an absent field falls back to the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<StoreSettings>,
}

impl SettingsOverride {
    /// Returns `true` if no field is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.logo.is_none()
            && self.description.is_none()
            && self.theme.is_none()
            && self.contact.is_none()
            && self.social.is_none()
            && self.settings.is_none()
    }

    /// Layer `patch` on top of `self`.
    ///
    /// Fields present in `patch` win wholesale; fields absent from `patch`
    /// keep their current value. Nested keys are never merged.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            name: patch.name.or(self.name),
            logo: patch.logo.or(self.logo),
            description: patch.description.or(self.description),
            theme: patch.theme.or(self.theme),
            contact: patch.contact.or(self.contact),
            social: patch.social.or(self.social),
            settings: patch.settings.or(self.settings),
        }
    }
}

/// Where a business sits in the draft/publish lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Baseline only.
    NoDraftUnpublished,
    /// Has a draft, never published.
    DraftUnpublished,
    /// Published, no pending edits.
    PublishedNoDraft,
    /// Published, with newer unpublished edits pending.
    PublishedWithDraft,
}

impl LifecycleState {
    /// Wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoDraftUnpublished => "NO_DRAFT_UNPUBLISHED",
            Self::DraftUnpublished => "DRAFT_UNPUBLISHED",
            Self::PublishedNoDraft => "PUBLISHED_NO_DRAFT",
            Self::PublishedWithDraft => "PUBLISHED_WITH_DRAFT",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that breaks the publish invariant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `is_published` is set but there is nothing published.
    #[error("business {0} is marked published but has no published settings")]
    PublishedWithoutSettings(BusinessId),
}

/// A tenant business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub slug: Slug,
    pub owner: Owner,

    // Baseline settings
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub settings: StoreSettings,

    // Lifecycle overlays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<SettingsOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<SettingsOverride>,
    #[serde(default)]
    pub is_published: bool,

    /// Bumped on every change; used for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Business {
    /// Create an unpublished business with empty baseline settings.
    #[must_use]
    pub fn new(id: BusinessId, slug: Slug, owner: Owner, name: impl Into<String>) -> Self {
        Self {
            id,
            slug,
            owner,
            name: name.into(),
            logo: String::new(),
            description: String::new(),
            theme: Theme::default(),
            contact: Contact::default(),
            social: Social::default(),
            settings: StoreSettings::default(),
            draft: None,
            published: None,
            is_published: false,
            version: 0,
            draft_updated_at: None,
            published_at: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    ///
    /// An empty draft counts as no draft.
    pub const fn lifecycle(&self) -> LifecycleState {
        match (self.is_published, self.has_pending_draft()) {
            (false, false) => LifecycleState::NoDraftUnpublished,
            (false, true) => LifecycleState::DraftUnpublished,
            (true, false) => LifecycleState::PublishedNoDraft,
            (true, true) => LifecycleState::PublishedWithDraft,
        }
    }

    /// Returns `true` if a non-empty draft is waiting to be published.
    #[must_use]
    pub const fn has_pending_draft(&self) -> bool {
        match &self.draft {
            Some(draft) => !draft.is_empty(),
            None => false,
        }
    }

    /// Check the publish invariant.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::PublishedWithoutSettings`] when
    /// `is_published` is set and `published` is absent.
    pub const fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.is_published && self.published.is_none() {
            return Err(InvariantViolation::PublishedWithoutSettings(self.id));
        }
        Ok(())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Merge `patch` into the draft, creating the draft if absent.
    ///
    /// An empty result is stored as no draft at all. Returns `true` if the
    /// draft changed.
    pub fn apply_draft_patch(&mut self, patch: SettingsOverride, now: DateTime<Utc>) -> bool {
        let merged = self.draft.clone().unwrap_or_default().merge(patch);
        let next = (!merged.is_empty()).then_some(merged);
        if self.draft == next {
            return false;
        }
        self.draft_updated_at = next.as_ref().map(|_| now);
        self.draft = next;
        true
    }

    /// Move the draft into `published` and clear it.
    ///
    /// The draft replaces the previous published override outright. Does
    /// nothing and returns `false` when the draft is absent or empty.
    pub fn promote_draft(&mut self, now: DateTime<Utc>) -> bool {
        match self.draft.take() {
            Some(draft) if !draft.is_empty() => {
                self.published = Some(draft);
                self.is_published = true;
                self.published_at = Some(now);
                self.draft_updated_at = None;
                true
            }
            untouched => {
                self.draft = untouched;
                false
            }
        }
    }

    /// Drop the draft. Returns `true` if there was one.
    pub fn clear_draft(&mut self) -> bool {
        if self.draft.take().is_some() {
            self.draft_updated_at = None;
            return true;
        }
        false
    }
}
