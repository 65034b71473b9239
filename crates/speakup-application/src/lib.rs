//! Application layer for the SpeakUp client.
//!
//! Coordinates the domain traits and the HTTP layer into the two pieces
//! every page relies on: the [`SessionManager`] and the
//! [`CollectionView`] fetch/optimistic-update contract. Page facades in
//! [`pages`] build on both.

pub mod collection;
pub mod context;
pub mod pages;
pub mod session;

pub use collection::{CollectionState, CollectionView, FetchOutcome, MutationPhase, ViewStatus};
pub use context::AppContext;
pub use session::SessionManager;
