//! Seed file validation.

use std::path::Path;

use tracing::{error, info};

use marketstall_storefront::registry::{InMemoryRegistry, SeedFile};

/// Parse and validate a seed file.
///
/// Logs every problem found rather than stopping at the first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if validation
/// finds any problem.
pub fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Validating seed file");

    let seed = SeedFile::from_path(path)?;
    info!(businesses = seed.businesses.len(), "Parsed seed file");

    let problems = seed.validate();
    if !problems.is_empty() {
        error!("Seed validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(format!("{} validation errors found", problems.len()).into());
    }

    // Loading exercises the registry's own insert checks too
    InMemoryRegistry::from_seed(seed)?;

    info!("Seed file is valid");
    Ok(())
}
