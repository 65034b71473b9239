//! Remote collections with optimistic edits.
//!
//! # Module Structure
//!
//! - `state`: the observable snapshot pages render
//! - `view`: fetching, filtering, optimistic edits and cancellation
//! - `mutation`: per-target locks and the ledger of the latest edit

mod mutation;
mod state;
mod view;

pub use mutation::{MutationPhase, MutationRecord};
pub use state::{CollectionState, FetchFailure, FetchOutcome, ViewStatus};
pub use view::CollectionView;
