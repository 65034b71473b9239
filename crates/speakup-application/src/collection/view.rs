use speakup_core::content::{CollectionSource, Filter, Identifiable};
use speakup_core::{Result, SpeakupError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::mutation::{MutationLedger, MutationPhase, MutationRecord};
use super::state::{CollectionState, FetchFailure, FetchOutcome, ViewStatus};

/// A remote list owned by one page.
///
/// `CollectionView` is responsible for:
/// - Fetching the list for the current filter and discarding responses of
///   superseded requests
/// - Keeping the last good items visible when a fetch fails
/// - Showing optimistic edits immediately and rolling them back on failure
/// - Cancelling in-flight requests when the page goes away
///
/// State is published through a `watch` channel; [`CollectionView::subscribe`]
/// hands out receivers.
pub struct CollectionView<T: Identifiable> {
    source: Arc<dyn CollectionSource<T>>,
    state: watch::Sender<CollectionState<T>>,
    ledger: MutationLedger<T>,
    cancel: CancellationToken,
}

impl<T: Identifiable> CollectionView<T> {
    pub fn new(source: Arc<dyn CollectionSource<T>>) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            source,
            state,
            ledger: MutationLedger::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn filter(&self) -> Filter {
        self.state.borrow().filter.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<T>> {
        self.state.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fetches with the current filter.
    pub async fn load(&self) -> Result<FetchOutcome> {
        self.fetch(self.filter()).await
    }

    /// Reissues the current filter after a failure. The search draft is
    /// left as typed.
    pub async fn retry(&self) -> Result<FetchOutcome> {
        tracing::debug!("retrying fetch");
        self.fetch(self.filter()).await
    }

    pub async fn fetch(&self, filter: Filter) -> Result<FetchOutcome> {
        self.fetch_with(filter, CancellationToken::new()).await
    }

    /// Fetches `filter`, giving up early if either `cancel` or the view is
    /// cancelled.
    ///
    /// Cancelling the current fetch hands the view back to the newest fetch
    /// still in flight, or, if there is none, restores the status and filter
    /// that match the shown items.
    ///
    /// # Errors
    ///
    /// Returns the source error when this fetch is still the latest one.
    /// The state then shows `Failed` and keeps the previous items.
    pub async fn fetch_with(&self, filter: Filter, cancel: CancellationToken) -> Result<FetchOutcome> {
        if self.is_closed() {
            return Ok(FetchOutcome::Cancelled);
        }

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.issued += 1;
            generation = s.issued;
            s.generation = generation;
            s.in_flight.insert(generation, filter.clone());
            s.filter = filter.clone();
            s.status = ViewStatus::Loading;
        });
        tracing::debug!(generation, ?filter, "fetch issued");

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            _ = cancel.cancelled() => None,
            result = self.source.fetch(&filter) => Some(result),
        };

        let Some(result) = result else {
            tracing::debug!(generation, "fetch cancelled");
            if !self.is_closed() {
                self.state.send_if_modified(|s| {
                    s.in_flight.remove(&generation);
                    if s.generation != generation {
                        return false;
                    }
                    match s.in_flight.last_key_value() {
                        Some((&older, older_filter)) => {
                            s.generation = older;
                            s.filter = older_filter.clone();
                        }
                        None => {
                            s.filter = s.settled_filter.clone();
                            s.status = s.settled_status.clone();
                        }
                    }
                    true
                });
            }
            return Ok(FetchOutcome::Cancelled);
        };

        let mut outcome = FetchOutcome::Superseded;
        let mut error = None;
        self.state.send_if_modified(|s| {
            s.in_flight.remove(&generation);
            if s.generation != generation {
                return false;
            }
            // The current fetch is always the newest one in flight.
            s.in_flight.clear();
            match result {
                Ok(items) => {
                    outcome = FetchOutcome::Applied { count: items.len() };
                    s.total = items.len();
                    s.items = items;
                    s.revision += 1;
                    s.status = ViewStatus::Ready;
                }
                Err(e) => {
                    s.status = ViewStatus::Failed(FetchFailure::from(&e));
                    error = Some(e);
                }
            }
            s.settled_status = s.status.clone();
            s.settled_filter = s.filter.clone();
            true
        });

        if let Some(e) = error {
            tracing::warn!(generation, kind = ?e.kind(), error = %e, "fetch failed");
            return Err(e);
        }
        match outcome {
            FetchOutcome::Applied { count } => {
                self.ledger.forget_settled();
                tracing::debug!(generation, count, "fetch applied");
            }
            _ => tracing::debug!(generation, "stale response discarded"),
        }
        Ok(outcome)
    }

    /// Records search-box text without fetching.
    pub fn set_search_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.search_draft = text);
    }

    /// Moves the draft into the filter and fetches. A blank draft clears
    /// the search.
    pub async fn submit_search(&self) -> Result<FetchOutcome> {
        let filter = {
            let state = self.state.borrow();
            state.filter.clone().with_search(Some(&state.search_draft))
        };
        self.fetch(filter).await
    }

    pub async fn search(&self, term: &str) -> Result<FetchOutcome> {
        self.set_search_draft(term);
        self.submit_search().await
    }

    /// Switches category (`None` or `"all"` for every category) and fetches.
    pub async fn set_category(&self, category: Option<&str>) -> Result<FetchOutcome> {
        let filter = self.filter().with_category(category);
        self.fetch(filter).await
    }

    /// Shows `mutate(current)` for `target_id` at once, then sends it.
    ///
    /// Edits of the same id run one after another. On success the item
    /// becomes `reconcile(pending, ack)`; on failure the exact previous
    /// value is restored and the error returned. A fetch that replaced the
    /// items meanwhile is left alone in both cases.
    ///
    /// # Errors
    ///
    /// `NotFound` when `target_id` is not in the list, otherwise the error
    /// of `send`.
    pub async fn apply_optimistic<A, M, S, Fut, R>(
        &self,
        target_id: &str,
        mutate: M,
        send: S,
        reconcile: R,
    ) -> Result<(T, A)>
    where
        M: FnOnce(&T) -> T,
        S: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<A>>,
        R: FnOnce(&T, &A) -> T,
    {
        let _turn = self.ledger.lock_target(target_id).await;

        let mut shown = None;
        self.state.send_if_modified(|s| {
            let Some(slot) = s.items.iter_mut().find(|item| item.id() == target_id) else {
                return false;
            };
            let previous = slot.clone();
            let pending = mutate(&previous);
            *slot = pending.clone();
            shown = Some((previous, pending, s.revision));
            true
        });
        let (previous, pending, revision) =
            shown.ok_or_else(|| SpeakupError::not_found("item", target_id))?;

        self.ledger.begin(target_id, previous.clone(), Some(pending.clone()));
        match send(pending.clone()).await {
            Ok(ack) => {
                let committed = reconcile(&pending, &ack);
                self.replace_item(target_id, revision, committed.clone());
                self.ledger.finish(target_id, MutationPhase::Committed);
                tracing::debug!(target_id, "optimistic edit committed");
                Ok((committed, ack))
            }
            Err(e) => {
                self.replace_item(target_id, revision, previous);
                self.ledger.finish(target_id, MutationPhase::RolledBack);
                tracing::warn!(target_id, kind = ?e.kind(), "optimistic edit rolled back");
                Err(e)
            }
        }
    }

    /// Hides `target_id` at once, then sends the removal. On failure the
    /// item is put back at its old position.
    pub async fn remove_optimistic<S, Fut>(&self, target_id: &str, send: S) -> Result<()>
    where
        S: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let _turn = self.ledger.lock_target(target_id).await;

        let mut removed = None;
        self.state.send_if_modified(|s| {
            let Some(index) = s.items.iter().position(|item| item.id() == target_id) else {
                return false;
            };
            let item = s.items.remove(index);
            s.total = s.total.saturating_sub(1);
            removed = Some((index, item, s.revision));
            true
        });
        let (index, item, revision) =
            removed.ok_or_else(|| SpeakupError::not_found("item", target_id))?;

        self.ledger.begin(target_id, item.clone(), None);
        match send().await {
            Ok(()) => {
                self.ledger.finish(target_id, MutationPhase::Committed);
                Ok(())
            }
            Err(e) => {
                self.state.send_if_modified(|s| {
                    if s.revision != revision {
                        return false;
                    }
                    let index = index.min(s.items.len());
                    s.items.insert(index, item);
                    s.total += 1;
                    true
                });
                self.ledger.finish(target_id, MutationPhase::RolledBack);
                tracing::warn!(target_id, kind = ?e.kind(), "removal rolled back");
                Err(e)
            }
        }
    }

    /// Awaits `submit` and prepends the created item. On failure the list
    /// is untouched so the caller can keep its draft.
    pub async fn create<F, Fut>(&self, submit: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let created = submit()
            .await
            .inspect_err(|e| tracing::warn!(kind = ?e.kind(), "create failed"))?;
        self.state.send_modify(|s| {
            s.items.insert(0, created.clone());
            s.total += 1;
        });
        tracing::debug!(id = created.id(), "created item prepended");
        Ok(created)
    }

    pub fn mutation_phase(&self, target_id: &str) -> MutationPhase {
        self.ledger.phase(target_id)
    }

    pub fn mutation(&self, target_id: &str) -> Option<MutationRecord<T>> {
        self.ledger.record(target_id)
    }

    /// Cancels every in-flight fetch. Later fetches return `Cancelled`.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    fn replace_item(&self, target_id: &str, revision: u64, value: T) {
        let replaced = self.state.send_if_modified(|s| {
            if s.revision != revision {
                return false;
            }
            match s.items.iter_mut().find(|item| item.id() == target_id) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        });
        if !replaced {
            tracing::debug!(target_id, "list replaced meanwhile; edit result not written");
        }
    }
}

impl<T: Identifiable> Drop for CollectionView<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
