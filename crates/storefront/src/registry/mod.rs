//! Business registry: the canonical store of tenant records.
//!
//! The storefront never reaches for a process-wide store. Handlers and
//! services receive an `Arc<dyn BusinessRepository>` through
//! [`AppState`](crate::state::AppState), so tests and future backends can
//! substitute their own implementation.
//!
//! # Implementations
//!
//! - [`InMemoryRegistry`] - lock-guarded vector plus an owner mapping table,
//!   populated from a [`seed`] file at start-up

pub mod memory;
pub mod seed;

use marketstall_core::{Business, BusinessId, Email, Slug};

pub use memory::InMemoryRegistry;
pub use seed::{SeedError, SeedFile};

/// Errors returned by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No business has the given ID.
    #[error("business {0} not found")]
    NotFound(BusinessId),

    /// The caller edited a stale copy of the business.
    #[error("business {id} is at version {actual}, expected {expected}")]
    VersionConflict {
        id: BusinessId,
        expected: u64,
        actual: u64,
    },

    /// Another business already uses this ID.
    #[error("duplicate business id: {0}")]
    DuplicateId(BusinessId),

    /// Another business already uses this slug.
    #[error("duplicate business slug: {0}")]
    DuplicateSlug(Slug),

    /// The seed data could not be loaded.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// A writer panicked while holding the store lock.
    #[error("registry lock poisoned")]
    LockPoisoned,
}

/// Read and write access to business records.
///
/// Lookups return owned snapshots. All writes go through [`modify`], which
/// applies a change atomically with respect to other callers.
///
/// [`modify`]: BusinessRepository::modify
pub trait BusinessRepository: Send + Sync {
    /// Look up a business by ID.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockPoisoned` if the store is unusable.
    fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RegistryError>;

    /// Look up a business by slug. The first match wins.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockPoisoned` if the store is unusable.
    fn get_by_slug(&self, slug: &Slug) -> Result<Option<Business>, RegistryError>;

    /// Businesses owned by `email`, in the order they were registered.
    ///
    /// Unknown owners get an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockPoisoned` if the store is unusable.
    fn businesses_for_owner(&self, email: &Email) -> Result<Vec<Business>, RegistryError>;

    /// Every business, in the order they were registered.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockPoisoned` if the store is unusable.
    fn all(&self) -> Result<Vec<Business>, RegistryError>;

    /// Register a new business.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateId` or `RegistryError::DuplicateSlug`
    /// if the business collides with an existing one.
    fn insert(&self, business: Business) -> Result<(), RegistryError>;

    /// Apply `change` to the business with the given ID.
    ///
    /// `change` returns whether it modified the record; the version is bumped
    /// only when it did. When `expected_version` is given it must match the
    /// stored version, otherwise nothing is applied.
    ///
    /// Returns the business as stored after the call.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown ID and
    /// `RegistryError::VersionConflict` for a stale `expected_version`.
    fn modify(
        &self,
        id: BusinessId,
        expected_version: Option<u64>,
        change: &mut dyn FnMut(&mut Business) -> bool,
    ) -> Result<Business, RegistryError>;
}
