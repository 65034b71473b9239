//! Domain layer for the SpeakUp client.
//!
//! Models, the error taxonomy and the traits every other crate plugs into.
//! Nothing here performs I/O.

pub mod config;
pub mod content;
pub mod error;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{ErrorKind, Result, SpeakupError};
