pub mod auth;
pub mod browse;
pub mod config;
pub mod scripts;

use anyhow::Result;
use serde::Serialize;

/// Chooses between JSON and human-readable output.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as pretty JSON when `--json` is set, otherwise runs
    /// `text`.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }
}
