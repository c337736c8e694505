//! Resolved storefront views.
//!
//! Public pages read businesses through [`StorefrontViews::effective_by_slug`],
//! which caches the resolved view per slug using `moka`. Each entry carries
//! the business version it was resolved from, and an entry is never replaced
//! by an older one. Publishing stores the new view directly, so a reader
//! holding an older snapshot cannot put it back after the publish.

use std::sync::Arc;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::instrument;

use marketstall_core::{
    Business, BusinessId, ResolvedBusiness, Slug, resolve_draft, resolve_effective,
};

use crate::config::ViewCacheConfig;
use crate::registry::{BusinessRepository, RegistryError};

/// Read path for resolved business views.
#[derive(Clone)]
pub struct StorefrontViews {
    inner: Arc<StorefrontViewsInner>,
}

struct StorefrontViewsInner {
    registry: Arc<dyn BusinessRepository>,
    cache: Cache<Slug, CachedView>,
}

/// A resolved view and the business version it came from.
#[derive(Debug, Clone)]
struct CachedView {
    version: u64,
    view: ResolvedBusiness,
}

impl From<&Business> for CachedView {
    fn from(business: &Business) -> Self {
        Self {
            version: business.version,
            view: resolve_effective(business),
        }
    }
}

impl StorefrontViews {
    /// Create a view reader over `registry`.
    #[must_use]
    pub fn new(registry: Arc<dyn BusinessRepository>, config: ViewCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            inner: Arc::new(StorefrontViewsInner { registry, cache }),
        }
    }

    /// The public view of the business at `slug`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the registry lookup fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn effective_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<ResolvedBusiness>, RegistryError> {
        if let Some(cached) = self.inner.cache.get(slug).await {
            tracing::debug!(version = cached.version, "Effective view cache hit");
            return Ok(Some(cached.view));
        }

        let Some(business) = self.inner.registry.get_by_slug(slug)? else {
            return Ok(None);
        };

        Ok(Some(self.refresh(&business).await))
    }

    /// Cache the public view of `business`, unless a newer one is cached.
    ///
    /// Returns the view that ends up cached.
    pub async fn refresh(&self, business: &Business) -> ResolvedBusiness {
        let fresh = CachedView::from(business);
        let candidate = fresh.clone();

        let result = self
            .inner
            .cache
            .entry(business.slug.clone())
            .and_compute_with(|existing| {
                let op = match existing {
                    Some(entry) if entry.value().version >= candidate.version => Op::Nop,
                    _ => Op::Put(candidate),
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Inserted(entry)
            | CompResult::ReplacedWith(entry)
            | CompResult::Unchanged(entry) => entry.into_value().view,
            CompResult::Removed(_) | CompResult::StillNone(_) => fresh.view,
        }
    }

    /// The editing view of a business. Never cached.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the registry lookup fails.
    pub fn draft_for(&self, id: BusinessId) -> Result<Option<ResolvedBusiness>, RegistryError> {
        Ok(self
            .inner
            .registry
            .get_by_id(id)?
            .as_ref()
            .map(resolve_draft))
    }
}
