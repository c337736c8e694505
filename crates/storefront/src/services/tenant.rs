//! Tenant selection for the vendor portal.
//!
//! A vendor may own several businesses. The one being managed is kept in the
//! session under [`SELECTED_BUSINESS`](crate::models::session_keys::SELECTED_BUSINESS)
//! and re-checked against the vendor's owned businesses on every read, so a
//! selection never outlives the ownership that justified it.
//!
//! Vendors with exactly one business never see the picker: that business is
//! selected on first read.

use tower_sessions::Session;
use tracing::instrument;

use marketstall_core::{Business, BusinessId, Email};

use crate::models::session_keys;
use crate::registry::{BusinessRepository, RegistryError};

/// Errors from tenant selection.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// No business has the given ID.
    #[error("business {0} not found")]
    NotFound(BusinessId),

    /// The business exists but belongs to someone else.
    #[error("business {0} is not owned by the current vendor")]
    NotOwned(BusinessId),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Tenant selection for one vendor's session.
pub struct TenantSelection<'a> {
    session: &'a Session,
    registry: &'a dyn BusinessRepository,
    vendor: &'a Email,
}

impl<'a> TenantSelection<'a> {
    /// Create a selection view for `vendor`'s session.
    #[must_use]
    pub const fn new(
        session: &'a Session,
        registry: &'a dyn BusinessRepository,
        vendor: &'a Email,
    ) -> Self {
        Self {
            session,
            registry,
            vendor,
        }
    }

    /// Businesses the vendor owns.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::Registry` if the lookup fails.
    pub fn owned_businesses(&self) -> Result<Vec<Business>, TenantError> {
        Ok(self.registry.businesses_for_owner(self.vendor)?)
    }

    /// Select the business to manage.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::NotOwned` if another vendor owns the business,
    /// `TenantError::NotFound` if it does not exist, and
    /// `TenantError::Session` if the session cannot be written.
    #[instrument(skip(self), fields(vendor = %self.vendor))]
    pub async fn select_business(&self, id: BusinessId) -> Result<Business, TenantError> {
        let owned = self.owned_businesses()?;
        let Some(business) = owned.into_iter().find(|b| b.id == id) else {
            return if self.registry.get_by_id(id)?.is_some() {
                tracing::warn!(business_id = %id, "Vendor tried to select a business they do not own");
                Err(TenantError::NotOwned(id))
            } else {
                Err(TenantError::NotFound(id))
            };
        };

        self.session
            .insert(session_keys::SELECTED_BUSINESS, business.id)
            .await?;
        tracing::info!(business_id = %business.id, slug = %business.slug, "Business selected");
        Ok(business)
    }

    /// The business currently being managed.
    ///
    /// Drops a stored selection the vendor no longer owns. When nothing is
    /// selected and the vendor owns exactly one business, selects it.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::Registry` or `TenantError::Session` if the
    /// lookup or session access fails.
    pub async fn current_selection(&self) -> Result<Option<Business>, TenantError> {
        let owned = self.owned_businesses()?;
        let stored: Option<BusinessId> = self.session.get(session_keys::SELECTED_BUSINESS).await?;

        if let Some(id) = stored {
            if let Some(business) = owned.iter().find(|b| b.id == id) {
                return Ok(Some(business.clone()));
            }
            tracing::warn!(business_id = %id, vendor = %self.vendor, "Dropping stale business selection");
            self.session
                .remove_value(session_keys::SELECTED_BUSINESS)
                .await?;
        }

        if let [only] = owned.as_slice() {
            self.session
                .insert(session_keys::SELECTED_BUSINESS, only.id)
                .await?;
            return Ok(Some(only.clone()));
        }

        Ok(None)
    }

    /// Whether the "choose a business" picker must be shown.
    ///
    /// True when the vendor owns several businesses and none is selected.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::Registry` or `TenantError::Session` if the
    /// lookup or session access fails.
    pub async fn picker_required(&self) -> Result<bool, TenantError> {
        if self.owned_businesses()?.len() < 2 {
            return Ok(false);
        }
        Ok(self.current_selection().await?.is_none())
    }

    /// Forget the selection.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::Session` if the session cannot be written.
    pub async fn clear(&self) -> Result<(), TenantError> {
        self.session
            .remove_value(session_keys::SELECTED_BUSINESS)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::registry::InMemoryRegistry;

    const MAYA: &str = "maya@greenleaf.example";
    const JONAS: &str = "jonas@copperkettle.example";

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_multi_business_vendor_needs_picker() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        let vendor = email(MAYA);
        let tenant = TenantSelection::new(&session, &registry, &vendor);

        assert_eq!(tenant.owned_businesses().unwrap().len(), 2);
        assert!(tenant.current_selection().await.unwrap().is_none());
        assert!(tenant.picker_required().await.unwrap());

        let selected = tenant.select_business(BusinessId::new(2)).await.unwrap();
        assert_eq!(selected.slug.as_str(), "harbor-books");
        assert!(!tenant.picker_required().await.unwrap());
        assert_eq!(
            tenant.current_selection().await.unwrap().unwrap().id,
            BusinessId::new(2)
        );
    }

    #[tokio::test]
    async fn test_single_business_vendor_is_auto_selected() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        let vendor = email(JONAS);
        let tenant = TenantSelection::new(&session, &registry, &vendor);

        assert!(!tenant.picker_required().await.unwrap());
        let current = tenant.current_selection().await.unwrap().unwrap();
        assert_eq!(current.id, BusinessId::new(3));

        let stored: Option<BusinessId> = session
            .get(session_keys::SELECTED_BUSINESS)
            .await
            .unwrap();
        assert_eq!(stored, Some(BusinessId::new(3)));
    }

    #[tokio::test]
    async fn test_cannot_select_foreign_business() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        let vendor = email(JONAS);
        let tenant = TenantSelection::new(&session, &registry, &vendor);

        let err = tenant.select_business(BusinessId::new(1)).await.unwrap_err();
        assert!(matches!(err, TenantError::NotOwned(_)));

        let err = tenant.select_business(BusinessId::new(99)).await.unwrap_err();
        assert!(matches!(err, TenantError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stale_selection_is_dropped() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        // Selection left behind by a different vendor on the same session
        session
            .insert(session_keys::SELECTED_BUSINESS, BusinessId::new(3))
            .await
            .unwrap();

        let vendor = email(MAYA);
        let tenant = TenantSelection::new(&session, &registry, &vendor);
        assert!(tenant.current_selection().await.unwrap().is_none());

        let stored: Option<BusinessId> = session
            .get(session_keys::SELECTED_BUSINESS)
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        let vendor = email(MAYA);
        let tenant = TenantSelection::new(&session, &registry, &vendor);

        tenant.select_business(BusinessId::new(1)).await.unwrap();
        tenant.clear().await.unwrap();
        assert!(tenant.picker_required().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_vendor_has_nothing() {
        let registry = InMemoryRegistry::demo().unwrap();
        let session = session();
        let vendor = email("stranger@example.com");
        let tenant = TenantSelection::new(&session, &registry, &vendor);

        assert!(tenant.owned_businesses().unwrap().is_empty());
        assert!(tenant.current_selection().await.unwrap().is_none());
        assert!(!tenant.picker_required().await.unwrap());
    }
}
