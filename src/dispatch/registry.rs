//! Handler registry keyed by site

use crate::handler::{Handler, HandlerError};
use crate::url::{parse_target, site_key};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Builds a fresh handler for one target
pub type HandlerFactory = Arc<dyn Fn() -> Result<Box<dyn Handler>, HandlerError> + Send + Sync>;

/// Errors raised by registration and resolution
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("A handler is already registered for {0}")]
    DuplicateRegistration(String),

    #[error("No handler registered for {0}")]
    UnknownHandler(String),

    #[error("Invalid site key '{0}'")]
    InvalidSiteKey(String),

    #[error("Could not construct handler for {site_key}: {source}")]
    Construction {
        site_key: String,
        source: HandlerError,
    },
}

/// Maps `scheme://host/` site keys to handler factories
///
/// Registration happens once at start-up. Resolution never hands out a
/// cached handler: every call runs the factory again.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, HandlerFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for the site identified by `site_key`
    ///
    /// The key is normalized first, so `https://g1.globo.com` and
    /// `https://g1.globo.com/any/path` name the same site.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Registered
    /// * `Err(RegistryError::DuplicateRegistration)` - The site already has a handler
    /// * `Err(RegistryError::InvalidSiteKey)` - The key is not an absolute HTTP(S) URL
    pub fn register<F>(&mut self, site_key_raw: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<Box<dyn Handler>, HandlerError> + Send + Sync + 'static,
    {
        let url = parse_target(site_key_raw)
            .map_err(|e| RegistryError::InvalidSiteKey(format!("{}: {}", site_key_raw, e)))?;
        let key = site_key(&url);

        if self.factories.contains_key(&key) {
            return Err(RegistryError::DuplicateRegistration(key));
        }

        tracing::debug!(site = %key, "Registered handler");
        self.factories.insert(key, Arc::new(factory));
        Ok(())
    }

    /// Creates a new handler for the site `url` belongs to
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn Handler>)` - A handler no one else holds
    /// * `Err(RegistryError::UnknownHandler)` - The site was never registered
    /// * `Err(RegistryError::Construction)` - The factory failed
    pub fn resolve(&self, url: &Url) -> Result<Box<dyn Handler>, RegistryError> {
        let key = site_key(url);
        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| RegistryError::UnknownHandler(url.to_string()))?;

        factory().map_err(|source| RegistryError::Construction {
            site_key: key,
            source,
        })
    }

    /// Registered site keys, sorted
    pub fn list_registered(&self) -> BTreeSet<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sites", &self.list_registered())
            .finish()
    }
}
