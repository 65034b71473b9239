use super::*;
use async_trait::async_trait;
use speakup_core::content::{LikeReceipt, Likeable};
use speakup_core::ErrorKind;
use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;
use tokio::sync::{Notify, oneshot};

#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: String,
    category: String,
    likes: u64,
    has_liked: bool,
}

impl Identifiable for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Likeable for Card {
    fn likes(&self) -> u64 {
        self.likes
    }

    fn has_liked(&self) -> bool {
        self.has_liked
    }

    fn set_like_state(&mut self, likes: u64, has_liked: bool) {
        self.likes = likes;
        self.has_liked = has_liked;
    }
}

fn card(id: &str, category: &str, likes: u64) -> Card {
    Card {
        id: id.into(),
        category: category.into(),
        likes,
        has_liked: false,
    }
}

type Reply = oneshot::Sender<Result<Vec<Card>>>;

/// A source whose responses the test hands out one by one, in any order.
#[derive(Default)]
struct ControlledSource {
    pending: StdMutex<VecDeque<(Filter, Reply)>>,
    issued: Notify,
}

impl ControlledSource {
    async fn next_request(&self) -> (Filter, Reply) {
        loop {
            if let Some(request) = self.pending.lock().unwrap().pop_front() {
                return request;
            }
            self.issued.notified().await;
        }
    }
}

#[async_trait]
impl CollectionSource<Card> for ControlledSource {
    async fn fetch(&self, filter: &Filter) -> Result<Vec<Card>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back((filter.clone(), tx));
        self.issued.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(SpeakupError::network("request dropped")))
    }
}

/// A source that answers immediately from a fixed list.
struct FixedSource(Vec<Card>);

#[async_trait]
impl CollectionSource<Card> for FixedSource {
    async fn fetch(&self, filter: &Filter) -> Result<Vec<Card>> {
        Ok(self
            .0
            .iter()
            .filter(|c| filter.category.as_deref().is_none_or(|cat| c.category == cat))
            .cloned()
            .collect())
    }
}

async fn loaded_view(cards: Vec<Card>) -> CollectionView<Card> {
    let view = CollectionView::new(Arc::new(FixedSource(cards)));
    view.load().await.unwrap();
    view
}

fn receipt(likes: u64, has_liked: bool) -> LikeReceipt {
    LikeReceipt {
        likes,
        has_liked: Some(has_liked),
        action: None,
    }
}

#[tokio::test]
async fn test_late_response_for_old_category_is_discarded() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());

    let (billing, safety, ()) = tokio::join!(
        view.set_category(Some("billing")),
        view.set_category(Some("safety")),
        async {
            let (first, reply_billing) = source.next_request().await;
            let (second, reply_safety) = source.next_request().await;
            assert_eq!(first.category.as_deref(), Some("billing"));
            assert_eq!(second.category.as_deref(), Some("safety"));
            reply_safety.send(Ok(vec![card("s1", "safety", 0)])).unwrap();
            tokio::task::yield_now().await;
            reply_billing.send(Ok(vec![card("b1", "billing", 0)])).unwrap();
        }
    );

    assert_eq!(billing.unwrap(), FetchOutcome::Superseded);
    assert_eq!(safety.unwrap(), FetchOutcome::Applied { count: 1 });
    let state = view.snapshot();
    assert_eq!(state.items, vec![card("s1", "safety", 0)]);
    assert_eq!(state.filter.category.as_deref(), Some("safety"));
    assert_eq!(state.status, ViewStatus::Ready);
}

#[tokio::test]
async fn test_failure_keeps_items_and_retry_recovers() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());

    let (first, ()) = tokio::join!(view.load(), async {
        let (_, reply) = source.next_request().await;
        reply.send(Ok(vec![card("a", "general", 1)])).unwrap();
    });
    first.unwrap();

    let (second, ()) = tokio::join!(view.load(), async {
        let (_, reply) = source.next_request().await;
        reply.send(Err(SpeakupError::server(503, "busy"))).unwrap();
    });
    assert_eq!(second.unwrap_err().kind(), ErrorKind::Server);

    let state = view.snapshot();
    assert_eq!(state.items.len(), 1);
    let failure = state.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::Server);
    assert!(failure.retryable);

    let (third, ()) = tokio::join!(view.retry(), async {
        let (_, reply) = source.next_request().await;
        reply
            .send(Ok(vec![card("a", "general", 1), card("b", "general", 2)]))
            .unwrap();
    });
    assert_eq!(third.unwrap(), FetchOutcome::Applied { count: 2 });
    assert_eq!(view.snapshot().status, ViewStatus::Ready);
    assert_eq!(view.snapshot().total, 2);
}

#[tokio::test]
async fn test_search_draft_survives_failed_search() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());
    view.set_search_draft("refund");

    let (result, ()) = tokio::join!(view.submit_search(), async {
        let (filter, reply) = source.next_request().await;
        assert_eq!(filter.search_term.as_deref(), Some("refund"));
        reply.send(Err(SpeakupError::network("offline"))).unwrap();
    });

    assert!(result.unwrap_err().is_network());
    let state = view.snapshot();
    assert_eq!(state.search_draft, "refund");
    assert_eq!(state.filter.search_term.as_deref(), Some("refund"));
}

#[tokio::test]
async fn test_drafting_does_not_fetch_and_blank_search_clears() {
    let view = loaded_view(vec![card("a", "general", 0)]).await;
    let generation = view.snapshot().generation;

    view.set_search_draft("ref");
    assert_eq!(view.snapshot().generation, generation);

    view.search("   ").await.unwrap();
    assert!(view.filter().search_term.is_none());
    assert_eq!(view.items().len(), 1);
}

#[tokio::test]
async fn test_all_category_fetches_everything() {
    let view = loaded_view(vec![card("a", "billing", 0), card("b", "safety", 0)]).await;

    view.set_category(Some("billing")).await.unwrap();
    assert_eq!(view.items().len(), 1);

    view.set_category(Some("all")).await.unwrap();
    assert_eq!(view.items().len(), 2);
    assert!(view.filter().category.is_none());
}

#[tokio::test]
async fn test_close_cancels_in_flight_fetch() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());

    let (outcome, _reply) = tokio::join!(view.load(), async {
        let (_, reply) = source.next_request().await;
        view.close();
        reply
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
    assert!(view.items().is_empty());
    assert_eq!(view.load().await.unwrap(), FetchOutcome::Cancelled);
}

#[tokio::test]
async fn test_cancelled_fetch_restores_previous_status() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());
    let cancel = CancellationToken::new();

    let (outcome, _reply) = tokio::join!(view.fetch_with(Filter::all(), cancel.clone()), async {
        let (_, reply) = source.next_request().await;
        cancel.cancel();
        reply
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
    assert_eq!(view.snapshot().status, ViewStatus::Idle);
    assert!(!view.is_closed());
}

#[tokio::test]
async fn test_cancelled_category_change_keeps_shown_category() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());
    let (loaded, ()) = tokio::join!(view.set_category(Some("billing")), async {
        let (_, reply) = source.next_request().await;
        reply.send(Ok(vec![card("b1", "billing", 0)])).unwrap();
    });
    loaded.unwrap();

    let cancel = CancellationToken::new();
    let safety = Filter::all().with_category(Some("safety"));
    let (outcome, _reply) = tokio::join!(view.fetch_with(safety, cancel.clone()), async {
        let (_, reply) = source.next_request().await;
        cancel.cancel();
        reply
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
    let state = view.snapshot();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.filter.category.as_deref(), Some("billing"));
    assert_eq!(state.items, vec![card("b1", "billing", 0)]);
}

#[tokio::test]
async fn test_cancelling_newer_fetch_lets_older_one_settle() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());

    let (billing, ()) = tokio::join!(view.set_category(Some("billing")), async {
        let (_, reply_billing) = source.next_request().await;

        let cancel = CancellationToken::new();
        let safety = Filter::all().with_category(Some("safety"));
        let (outcome, _reply) = tokio::join!(view.fetch_with(safety, cancel.clone()), async {
            let (_, reply) = source.next_request().await;
            cancel.cancel();
            reply
        });
        assert_eq!(outcome.unwrap(), FetchOutcome::Cancelled);
        let state = view.snapshot();
        assert!(state.is_loading());
        assert_eq!(state.filter.category.as_deref(), Some("billing"));

        reply_billing.send(Ok(vec![card("b1", "billing", 0)])).unwrap();
    });

    assert_eq!(billing.unwrap(), FetchOutcome::Applied { count: 1 });
    let state = view.snapshot();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.filter.category.as_deref(), Some("billing"));
    assert_eq!(state.items, vec![card("b1", "billing", 0)]);
}

#[tokio::test]
async fn test_like_shows_pending_then_server_count() {
    let view = loaded_view(vec![card("s1", "billing", 4)]).await;

    let (committed, _) = view
        .apply_optimistic(
            "s1",
            Card::toggled,
            |pending| {
                let shown = view.items()[0].clone();
                async move {
                    assert_eq!(shown, pending);
                    assert_eq!((shown.likes, shown.has_liked), (5, true));
                    Ok(receipt(9, true))
                }
            },
            |pending, receipt| pending.reconciled(receipt),
        )
        .await
        .unwrap();

    assert_eq!(committed.likes, 9);
    assert_eq!(view.items()[0].likes, 9);
    assert_eq!(view.mutation_phase("s1"), MutationPhase::Committed);
}

#[tokio::test]
async fn test_failed_like_restores_exact_previous_value() {
    let view = loaded_view(vec![card("s1", "billing", 4)]).await;
    let before = view.items()[0].clone();

    let err = view
        .apply_optimistic(
            "s1",
            Card::toggled,
            |_| async { Err::<LikeReceipt, _>(SpeakupError::network("offline")) },
            |pending, receipt| pending.reconciled(receipt),
        )
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert_eq!(view.items()[0], before);
    assert_eq!(view.mutation_phase("s1"), MutationPhase::RolledBack);
    let record = view.mutation("s1").unwrap();
    assert_eq!(record.previous, before);
    assert_eq!(record.pending.map(|p| p.likes), Some(5));
    assert_eq!(view.ledger.locked_targets(), 0);
}

#[tokio::test]
async fn test_edits_of_one_target_run_in_order() {
    let view = loaded_view(vec![card("s1", "billing", 4)]).await;
    let first_started = Notify::new();
    let (release_first, first_reply) = oneshot::channel::<Result<LikeReceipt>>();
    let sends = StdMutex::new(Vec::new());

    let (first, second, ()) = tokio::join!(
        view.apply_optimistic(
            "s1",
            Card::toggled,
            |pending| {
                sends.lock().unwrap().push(("first", pending.likes));
                first_started.notify_one();
                async move { first_reply.await.unwrap() }
            },
            |pending, receipt| pending.reconciled(receipt),
        ),
        view.apply_optimistic(
            "s1",
            Card::toggled,
            |pending| {
                sends.lock().unwrap().push(("second", pending.likes));
                async { Ok(receipt(5, true)) }
            },
            |pending, receipt| pending.reconciled(receipt),
        ),
        async {
            first_started.notified().await;
            tokio::task::yield_now().await;
            assert_eq!(sends.lock().unwrap().len(), 1);
            release_first
                .send(Err(SpeakupError::server(500, "write failed")))
                .unwrap();
        }
    );

    assert!(first.is_err());
    assert_eq!(second.unwrap().0.likes, 5);
    // The second edit started from the rolled-back value, and the first
    // edit's rollback did not overwrite its result.
    assert_eq!(*sends.lock().unwrap(), vec![("first", 5), ("second", 5)]);
    let item = view.items()[0].clone();
    assert_eq!((item.likes, item.has_liked), (5, true));
    assert_eq!(view.mutation_phase("s1"), MutationPhase::Committed);
    assert_eq!(view.ledger.locked_targets(), 0);
}

#[tokio::test]
async fn test_edit_result_does_not_touch_newer_list() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());
    let (loaded, ()) = tokio::join!(view.load(), async {
        let (_, reply) = source.next_request().await;
        reply.send(Ok(vec![card("s1", "billing", 4)])).unwrap();
    });
    loaded.unwrap();

    let (release, reply) = oneshot::channel::<Result<LikeReceipt>>();
    let (edit, refetch, ()) = tokio::join!(
        view.apply_optimistic(
            "s1",
            Card::toggled,
            |_| async move { reply.await.unwrap() },
            |pending, receipt| pending.reconciled(receipt),
        ),
        view.load(),
        async {
            let (_, list) = source.next_request().await;
            list.send(Ok(vec![card("s1", "billing", 10)])).unwrap();
            tokio::task::yield_now().await;
            release.send(Ok(receipt(5, true))).unwrap();
        }
    );

    edit.unwrap();
    refetch.unwrap();
    assert_eq!(view.items()[0].likes, 10);
}

#[tokio::test]
async fn test_unknown_target_is_not_found() {
    let view = loaded_view(vec![card("s1", "billing", 4)]).await;

    let err = view
        .apply_optimistic(
            "missing",
            Card::toggled,
            |_| async { Ok(receipt(1, true)) },
            |pending, receipt| pending.reconciled(receipt),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(view.mutation_phase("missing"), MutationPhase::Clean);
}

#[tokio::test]
async fn test_failed_removal_reinserts_at_original_index() {
    let view = loaded_view(vec![
        card("a", "general", 0),
        card("b", "general", 0),
        card("c", "general", 0),
    ])
    .await;

    let err = view
        .remove_optimistic("b", || async {
            Err(SpeakupError::network("offline"))
        })
        .await
        .unwrap_err();
    assert!(err.is_network());
    let ids: Vec<_> = view.items().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(view.snapshot().total, 3);

    view.remove_optimistic("b", || async { Ok(()) }).await.unwrap();
    let ids: Vec<_> = view.items().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(view.snapshot().total, 2);
}

#[tokio::test]
async fn test_create_prepends_and_counts() {
    let view = loaded_view(vec![card("a", "general", 0)]).await;

    let err = view
        .create(|| async { Err(SpeakupError::validation("situation is required")) })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(view.items().len(), 1);

    view.create(|| async { Ok(card("new", "general", 0)) })
        .await
        .unwrap();
    let state = view.snapshot();
    assert_eq!(state.items[0].id, "new");
    assert_eq!(state.total, 2);
}

#[tokio::test]
async fn test_subscribers_see_loading_then_ready() {
    let source = Arc::new(ControlledSource::default());
    let view = CollectionView::new(source.clone());
    let mut rx = view.subscribe();

    let (result, ()) = tokio::join!(view.load(), async {
        rx.wait_for(|s| s.is_loading()).await.unwrap();
        let (_, reply) = source.next_request().await;
        reply.send(Ok(vec![card("a", "general", 0)])).unwrap();
    });

    result.unwrap();
    assert_eq!(rx.borrow_and_update().status, ViewStatus::Ready);
}
