//! Response envelope shared by every backend endpoint.

use serde::Deserialize;
use speakup_core::{Result, SpeakupError};

/// `{ success?, data?, count?, message? }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Returns `data`, failing when the server omitted it.
    pub fn into_data(self, context: &str) -> Result<T> {
        self.data.ok_or_else(|| SpeakupError::Serialization {
            format: "JSON".to_string(),
            message: format!("Response to {context} has no data field"),
        })
    }
}

/// Body of a non-2xx answer.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
