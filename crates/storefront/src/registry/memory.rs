//! In-memory business registry.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use marketstall_core::{Business, BusinessId, Email, Slug};

use super::seed::SeedFile;
use super::{BusinessRepository, RegistryError};

/// Registry backed by a vector of businesses and an owner mapping table.
///
/// A single `RwLock` guards both, so every [`modify`](BusinessRepository::modify)
/// is atomic from the caller's point of view.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    businesses: Vec<Business>,
    /// Owner email -> business IDs, in registration order.
    owners: HashMap<Email, Vec<BusinessId>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `businesses`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateId` or `RegistryError::DuplicateSlug`
    /// if two businesses collide.
    pub fn from_businesses(
        businesses: impl IntoIterator<Item = Business>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for business in businesses {
            registry.insert(business)?;
        }
        Ok(registry)
    }

    /// Create a registry from a parsed seed file.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidSeed` if the seed fails validation.
    pub fn from_seed(seed: SeedFile) -> Result<Self, RegistryError> {
        let problems = seed.validate();
        if !problems.is_empty() {
            let joined = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RegistryError::InvalidSeed(joined));
        }
        Self::from_businesses(seed.businesses)
    }

    /// Create a registry holding the built-in demo businesses.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidSeed` if the bundled seed is broken.
    pub fn demo() -> Result<Self, RegistryError> {
        let seed = SeedFile::demo().map_err(|e| RegistryError::InvalidSeed(e.to_string()))?;
        Self::from_seed(seed)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }
}

impl BusinessRepository for InMemoryRegistry {
    fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RegistryError> {
        let inner = self.read()?;
        Ok(inner.businesses.iter().find(|b| b.id == id).cloned())
    }

    fn get_by_slug(&self, slug: &Slug) -> Result<Option<Business>, RegistryError> {
        let inner = self.read()?;
        Ok(inner.businesses.iter().find(|b| &b.slug == slug).cloned())
    }

    fn businesses_for_owner(&self, email: &Email) -> Result<Vec<Business>, RegistryError> {
        let inner = self.read()?;
        let Some(ids) = inner.owners.get(email) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .filter_map(|id| inner.businesses.iter().find(|b| b.id == *id))
            // The mapping table is not trusted on its own
            .filter(|b| &b.owner.email == email)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Business>, RegistryError> {
        Ok(self.read()?.businesses.clone())
    }

    fn insert(&self, business: Business) -> Result<(), RegistryError> {
        let mut inner = self.write()?;

        if inner.businesses.iter().any(|b| b.id == business.id) {
            return Err(RegistryError::DuplicateId(business.id));
        }
        if inner.businesses.iter().any(|b| b.slug == business.slug) {
            return Err(RegistryError::DuplicateSlug(business.slug));
        }

        inner
            .owners
            .entry(business.owner.email.clone())
            .or_default()
            .push(business.id);
        inner.businesses.push(business);
        Ok(())
    }

    fn modify(
        &self,
        id: BusinessId,
        expected_version: Option<u64>,
        change: &mut dyn FnMut(&mut Business) -> bool,
    ) -> Result<Business, RegistryError> {
        let mut inner = self.write()?;
        let stored = inner
            .businesses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        if let Some(expected) = expected_version
            && expected != stored.version
        {
            return Err(RegistryError::VersionConflict {
                id,
                expected,
                actual: stored.version,
            });
        }

        // Work on a copy so a panicking change cannot leave a half-applied record
        let mut candidate = stored.clone();
        if change(&mut candidate) {
            candidate.version += 1;
            *stored = candidate;
        }

        Ok(stored.clone())
    }
}
