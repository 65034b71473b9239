//! Session application services.
//!
//! The [`SessionManager`] is the single owner of the authentication state;
//! every page reads it through snapshots or a `watch` subscription.

mod manager;

pub use manager::SessionManager;
