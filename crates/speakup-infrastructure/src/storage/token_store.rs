//! Token store implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use speakup_core::Result;
use speakup_core::session::{TOKEN_KEY, TokenStore};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::atomic_toml::AtomicTomlFile;
use crate::paths::SpeakupPaths;

/// On-disk layout of `session.toml`.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Persists the token in `session.toml` under the `token` key.
pub struct FileTokenStore {
    file: AtomicTomlFile<SessionFile>,
}

impl FileTokenStore {
    /// Uses the platform session file (`~/.config/speakup/session.toml`).
    pub fn new(paths: &SpeakupPaths) -> Result<Self> {
        Ok(Self::with_path(paths.session_file()?))
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let stored = self.file.load()?;
        Ok(stored.map(|s| s.token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        tracing::debug!(path = %self.file.path().display(), "persisting session token");
        self.file.save(&SessionFile {
            token: token.to_string(),
            saved_at: Utc::now(),
        })
    }

    fn clear(&self) -> Result<()> {
        tracing::debug!(path = %self.file.path().display(), "clearing session token");
        self.file.remove()
    }
}

/// Process-local key/value store, the stand-in for browser local storage
/// in tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `token` already stored, as after a previous run.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(TOKEN_KEY.to_string(), token.into());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map still holds valid strings.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock().get(TOKEN_KEY).cloned())
    }

    fn save(&self, token: &str) -> Result<()> {
        self.lock().insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock().remove(TOKEN_KEY);
        Ok(())
    }
}
