//! Draft/publish transitions.
//!
//! # Lifecycle
//!
//! ```text
//! NO_DRAFT_UNPUBLISHED --update_draft--> DRAFT_UNPUBLISHED
//! DRAFT_UNPUBLISHED    --publish------> PUBLISHED_NO_DRAFT
//! DRAFT_UNPUBLISHED    --discard------> NO_DRAFT_UNPUBLISHED
//! PUBLISHED_NO_DRAFT   --update_draft--> PUBLISHED_WITH_DRAFT
//! PUBLISHED_WITH_DRAFT --publish------> PUBLISHED_NO_DRAFT
//! PUBLISHED_WITH_DRAFT --discard------> PUBLISHED_NO_DRAFT
//! ```
//!
//! Publishing without a pending draft changes nothing and reports
//! [`PublishOutcome::NothingToPublish`]. Unknown IDs return
//! `RegistryError::NotFound` without touching the store.
//!
//! Every operation accepts an optional expected version. `None` means
//! last write wins.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use marketstall_core::{Business, BusinessId, SettingsOverride};

use super::views::StorefrontViews;
use crate::error::add_breadcrumb;
use crate::registry::{BusinessRepository, RegistryError};

/// Result of a publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The draft became the published settings.
    Published(Business),
    /// There was no pending draft; the business is unchanged.
    NothingToPublish(Business),
}

impl PublishOutcome {
    /// The business as stored after the request.
    #[must_use]
    pub const fn business(&self) -> &Business {
        match self {
            Self::Published(b) | Self::NothingToPublish(b) => b,
        }
    }

    /// Consume the outcome, returning the business.
    #[must_use]
    pub fn into_business(self) -> Business {
        match self {
            Self::Published(b) | Self::NothingToPublish(b) => b,
        }
    }

    /// Whether anything was published.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Applies vendor edits to businesses.
#[derive(Clone)]
pub struct PublishingService {
    registry: Arc<dyn BusinessRepository>,
    views: StorefrontViews,
}

impl PublishingService {
    /// Create a publishing service.
    ///
    /// `views` must read from the same registry so publishes can refresh
    /// its cache.
    #[must_use]
    pub fn new(registry: Arc<dyn BusinessRepository>, views: StorefrontViews) -> Self {
        Self { registry, views }
    }

    /// Merge `patch` into the business's draft, creating the draft if needed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown ID and
    /// `RegistryError::VersionConflict` for a stale `expected_version`.
    #[instrument(skip(self, patch), fields(business_id = %id))]
    pub fn update_draft(
        &self,
        id: BusinessId,
        patch: SettingsOverride,
        expected_version: Option<u64>,
    ) -> Result<Business, RegistryError> {
        let now = Utc::now();
        let mut patch = Some(patch);
        let business = self.registry.modify(id, expected_version, &mut |b| {
            patch.take().is_some_and(|p| b.apply_draft_patch(p, now))
        })?;

        tracing::info!(
            slug = %business.slug,
            lifecycle = %business.lifecycle(),
            version = business.version,
            "Draft updated"
        );
        Ok(business)
    }

    /// Promote the pending draft to the published settings.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown ID and
    /// `RegistryError::VersionConflict` for a stale `expected_version`.
    #[instrument(skip(self), fields(business_id = %id))]
    pub async fn publish(
        &self,
        id: BusinessId,
        expected_version: Option<u64>,
    ) -> Result<PublishOutcome, RegistryError> {
        let now = Utc::now();
        let mut promoted = false;
        let business = self.registry.modify(id, expected_version, &mut |b| {
            promoted = b.promote_draft(now);
            promoted
        })?;

        if !promoted {
            tracing::debug!(slug = %business.slug, "No pending draft to publish");
            return Ok(PublishOutcome::NothingToPublish(business));
        }

        self.views.refresh(&business).await;

        let id_str = id.to_string();
        add_breadcrumb(
            "publishing",
            "Published storefront settings",
            Some(&[("business_id", id_str.as_str()), ("slug", business.slug.as_str())]),
        );
        tracing::info!(
            slug = %business.slug,
            lifecycle = %business.lifecycle(),
            version = business.version,
            "Draft published"
        );
        Ok(PublishOutcome::Published(business))
    }

    /// Throw away the pending draft. Published settings are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown ID and
    /// `RegistryError::VersionConflict` for a stale `expected_version`.
    #[instrument(skip(self), fields(business_id = %id))]
    pub fn discard_draft(
        &self,
        id: BusinessId,
        expected_version: Option<u64>,
    ) -> Result<Business, RegistryError> {
        let business = self
            .registry
            .modify(id, expected_version, &mut Business::clear_draft)?;

        tracing::info!(
            slug = %business.slug,
            lifecycle = %business.lifecycle(),
            version = business.version,
            "Draft discarded"
        );
        Ok(business)
    }
}
