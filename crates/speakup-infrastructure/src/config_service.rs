//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/speakup/config.toml` and
//! applies the `SPEAKUP_API_URL` override.

use crate::paths::SpeakupPaths;
use crate::storage::AtomicTomlFile;
use speakup_core::Result;
use speakup_core::config::{API_URL_ENV, ClientConfig};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &SpeakupPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults; a malformed file is an error so the
    /// user never silently talks to the wrong backend.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config(std::env::var(API_URL_ENV).ok())?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Writes `config` to the file and refreshes the cache.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        AtomicTomlFile::new(self.path.clone()).save(config)?;
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }

    fn load_config(&self, env_override: Option<String>) -> Result<ClientConfig> {
        let from_file = AtomicTomlFile::<ClientConfig>::new(self.path.clone()).load()?;
        if from_file.is_none() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
        }
        Ok(from_file
            .unwrap_or_default()
            .with_api_url_override(env_override))
    }
}
