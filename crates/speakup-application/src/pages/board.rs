use speakup_core::content::{
    CategoryInfo, CollectionSource, ContentRepository, Entity, LikeReceipt, LikeRepository,
    Likeable,
};
use speakup_core::{Result, SpeakupError};
use std::sync::Arc;

use crate::collection::{CollectionView, FetchOutcome};
use crate::session::SessionManager;

/// List page for one content resource (scenarios, stories or tips).
///
/// Reads are open to everyone. Creating and liking need a signed-in
/// session and fail with `Unauthorized` before any request otherwise.
pub struct ContentBoard<T: Entity> {
    view: CollectionView<T>,
    repository: Arc<dyn ContentRepository<T>>,
    likes: Option<Arc<dyn LikeRepository>>,
    session: Arc<SessionManager>,
}

impl<T: Entity> ContentBoard<T> {
    pub fn new<R>(repository: Arc<R>, session: Arc<SessionManager>) -> Self
    where
        R: ContentRepository<T> + 'static,
    {
        let source: Arc<dyn CollectionSource<T>> = repository.clone();
        Self {
            view: CollectionView::new(source),
            repository,
            likes: None,
            session,
        }
    }

    /// Enables [`toggle_like`](Self::toggle_like) for this resource.
    pub fn with_likes(mut self, likes: Arc<dyn LikeRepository>) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn view(&self) -> &CollectionView<T> {
        &self.view
    }

    pub async fn load(&self) -> Result<FetchOutcome> {
        self.view.load().await
    }

    pub async fn set_category(&self, category: Option<&str>) -> Result<FetchOutcome> {
        self.view.set_category(category).await
    }

    pub async fn search(&self, term: &str) -> Result<FetchOutcome> {
        self.view.search(term).await
    }

    pub async fn retry(&self) -> Result<FetchOutcome> {
        self.view.retry().await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryInfo>> {
        self.repository.categories().await
    }

    pub async fn detail(&self, id: &str) -> Result<T> {
        self.repository.find_by_id(id).await
    }

    /// Submits `draft` and prepends the result.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when signed out; otherwise the backend error with
    /// the list left as it was.
    pub async fn create(&self, draft: &T::Draft) -> Result<T> {
        self.session.require_authenticated()?;
        self.view.create(|| self.repository.create(draft)).await
    }

    pub fn close(&self) {
        self.view.close();
    }
}

impl<T: Entity + Likeable> ContentBoard<T> {
    /// Likes or unlikes `id`, showing the new count at once and settling
    /// on the server's count.
    pub async fn toggle_like(&self, id: &str) -> Result<(T, LikeReceipt)> {
        self.session.require_authenticated()?;
        let likes = self
            .likes
            .as_ref()
            .ok_or_else(|| SpeakupError::internal(format!("{} cannot be liked", T::ENTITY_TYPE)))?;
        self.view
            .apply_optimistic(
                id,
                <T as Likeable>::toggled,
                |_| likes.like(id),
                |pending, receipt| pending.reconciled(receipt),
            )
            .await
    }
}
