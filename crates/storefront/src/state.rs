//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::registry::{BusinessRepository, InMemoryRegistry, RegistryError, SeedFile};
use crate::services::{PublishingService, StorefrontViews};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the business registry and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    registry: Arc<dyn BusinessRepository>,
    views: StorefrontViews,
    publishing: PublishingService,
}

impl AppState {
    /// Create a new application state over `registry`.
    #[must_use]
    pub fn new(config: StorefrontConfig, registry: Arc<dyn BusinessRepository>) -> Self {
        let views = StorefrontViews::new(registry.clone(), config.view_cache);
        let publishing = PublishingService::new(registry.clone(), views.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                views,
                publishing,
            }),
        }
    }

    /// Create application state, loading the registry from the configured
    /// seed file or the bundled demo seed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidSeed` if the seed cannot be read,
    /// parsed or validated.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, RegistryError> {
        let registry = load_registry(&config)?;
        Ok(Self::new(config, Arc::new(registry)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the business registry.
    #[must_use]
    pub fn registry(&self) -> &dyn BusinessRepository {
        self.inner.registry.as_ref()
    }

    /// Get a reference to the resolved view reader.
    #[must_use]
    pub fn views(&self) -> &StorefrontViews {
        &self.inner.views
    }

    /// Get a reference to the draft/publish service.
    #[must_use]
    pub fn publishing(&self) -> &PublishingService {
        &self.inner.publishing
    }
}

/// Build the registry described by `config`.
fn load_registry(config: &StorefrontConfig) -> Result<InMemoryRegistry, RegistryError> {
    let Some(path) = &config.seed_file else {
        tracing::info!("No seed file configured, loading demo businesses");
        return InMemoryRegistry::demo();
    };

    let seed = SeedFile::from_path(path)
        .map_err(|e| RegistryError::InvalidSeed(format!("{}: {e}", path.display())))?;
    let registry = InMemoryRegistry::from_seed(seed)?;
    tracing::info!(path = %path.display(), "Loaded seed file");
    Ok(registry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_from_config_uses_demo_seed() {
        let state = AppState::from_config(StorefrontConfig::default()).unwrap();
        assert_eq!(state.registry().all().unwrap().len(), 3);
    }

    #[test]
    fn test_from_config_missing_seed_file() {
        let config = StorefrontConfig {
            seed_file: Some(PathBuf::from("/definitely/not/here.yaml")),
            ..StorefrontConfig::default()
        };
        let result = AppState::from_config(config);
        assert!(matches!(result, Err(RegistryError::InvalidSeed(msg)) if msg.contains("here.yaml")));
    }
}
