//! Seed files for the business registry.
//!
//! Businesses are created by seeding, never through the vendor portal. A seed
//! file is YAML with a single `businesses` list, each entry shaped like a
//! serialized [`Business`]:
//!
//! ```yaml
//! businesses:
//!   - id: 1
//!     slug: green-leaf-market
//!     owner: { name: Maya Chen, email: maya@greenleaf.example }
//!     name: Green Leaf Market
//!     theme: { primary: "#2f855a", secondary: "#f0fff4", accent: "#dd6b20" }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use marketstall_core::{Business, BusinessId, InvariantViolation, Slug};

/// The bundled demo seed.
const DEMO_SEED: &str = include_str!("../../seed/demo.yaml");

/// Errors reading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A problem found while validating a parsed seed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedProblem {
    #[error("business id {0} is used more than once")]
    DuplicateId(BusinessId),
    #[error("slug {slug} is used by businesses {first} and {second}")]
    DuplicateSlug {
        slug: Slug,
        first: BusinessId,
        second: BusinessId,
    },
    #[error("business {0} has an empty name")]
    EmptyName(BusinessId),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Parsed contents of a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub businesses: Vec<Business>,
}

impl SeedFile {
    /// Parse a seed from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the YAML is malformed or a field fails
    /// validation (for example an invalid slug or email).
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` if the file cannot be read and
    /// `SeedError::Parse` if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// The bundled demo seed.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the bundled file is malformed.
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_yaml(DEMO_SEED)
    }

    /// Check cross-record constraints that parsing alone cannot.
    ///
    /// Returns every problem found; an empty list means the seed is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<SeedProblem> {
        let mut problems = Vec::new();
        let mut ids: HashSet<BusinessId> = HashSet::new();
        let mut slugs: HashMap<&Slug, BusinessId> = HashMap::new();

        for business in &self.businesses {
            if !ids.insert(business.id) {
                problems.push(SeedProblem::DuplicateId(business.id));
            }

            if let Some(first) = slugs.get(&business.slug) {
                problems.push(SeedProblem::DuplicateSlug {
                    slug: business.slug.clone(),
                    first: *first,
                    second: business.id,
                });
            } else {
                slugs.insert(&business.slug, business.id);
            }

            if business.name.trim().is_empty() {
                problems.push(SeedProblem::EmptyName(business.id));
            }

            if let Err(violation) = business.check_invariants() {
                problems.push(violation.into());
            }
        }

        problems
    }
}
