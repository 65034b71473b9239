//! Unified path management for SpeakUp client files.
//!
//! ```text
//! ~/.config/speakup/           # Config directory
//! ├── config.toml              # Client configuration
//! └── session.toml             # Persisted session token (mode 600)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "speakup";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for speakup_core::SpeakupError {
    fn from(err: PathError) -> Self {
        speakup_core::SpeakupError::config(err.to_string())
    }
}

/// Resolves every file the client reads or writes.
///
/// `SpeakupPaths::new(None)` uses the platform config directory;
/// `SpeakupPaths::new(Some(dir))` roots everything in `dir` (tests, portable
/// installs).
#[derive(Debug, Clone)]
pub struct SpeakupPaths {
    base_override: Option<PathBuf>,
}

impl SpeakupPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the SpeakUp configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// File holding the persisted session token.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }
}

impl Default for SpeakupPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir_ends_with_app_dir() {
        if let Ok(dir) = SpeakupPaths::default().config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }

    #[test]
    fn test_override_roots_every_file() {
        let paths = SpeakupPaths::new(Some(PathBuf::from("/tmp/speakup-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/speakup-test/config.toml")
        );
        assert_eq!(
            paths.session_file().unwrap(),
            PathBuf::from("/tmp/speakup-test/session.toml")
        );
    }
}
