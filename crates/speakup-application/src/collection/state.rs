//! Observable state of a remote collection.

use speakup_core::content::Filter;
use speakup_core::{ErrorKind, SpeakupError};
use std::collections::BTreeMap;

/// Lifecycle of the latest fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// The latest fetch failed. `items` still hold the last good result.
    Failed(FetchFailure),
}

/// What a page needs to render an error banner and a retry button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&SpeakupError> for FetchFailure {
    fn from(err: &SpeakupError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Everything a list page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub status: ViewStatus,
    /// Filter of the fetch whose response will be applied.
    pub filter: Filter,
    /// Search-box text not yet submitted.
    pub search_draft: String,
    /// Aggregate counter shown next to the list.
    pub total: usize,
    /// Generation of the fetch whose response will be applied. Every
    /// issued fetch takes a new one; cancelling the current fetch hands
    /// this back to the newest fetch still in flight.
    pub generation: u64,
    /// Bumped each time a fetch result replaces `items`.
    pub(crate) revision: u64,
    pub(crate) issued: u64,
    /// Unanswered fetches by generation.
    pub(crate) in_flight: BTreeMap<u64, Filter>,
    /// Status and filter that match `items`; restored when the current
    /// fetch is cancelled with nothing else in flight.
    pub(crate) settled_status: ViewStatus,
    pub(crate) settled_filter: Filter,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: ViewStatus::Idle,
            filter: Filter::default(),
            search_draft: String::new(),
            total: 0,
            generation: 0,
            revision: 0,
            issued: 0,
            in_flight: BTreeMap::new(),
            settled_status: ViewStatus::Idle,
            settled_filter: Filter::default(),
        }
    }
}

impl<T> CollectionState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == ViewStatus::Loading
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.status {
            ViewStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// How a fetch ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the items.
    Applied { count: usize },
    /// A newer fetch was issued first; the response was discarded.
    Superseded,
    /// The view was closed or the fetch cancelled before it resolved.
    Cancelled,
}
