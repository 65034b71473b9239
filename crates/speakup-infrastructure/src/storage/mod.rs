//! Storage layer for the client's local files.

mod atomic_toml;
mod token_store;

pub use atomic_toml::AtomicTomlFile;
pub use token_store::{FileTokenStore, MemoryTokenStore};
