//! Generic REST repository for scenarios, stories and tips.

use async_trait::async_trait;
use speakup_core::content::{
    CategoryInfo, CollectionSource, ContentRepository, Entity, Filter, LikeReceipt, LikeRepository,
};
use speakup_core::{Result, SpeakupError};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::{Access, ApiClient};

/// `GET|POST /{resource}`, `GET /{resource}/{id}`, `GET /{resource}/categories`
/// and `POST /{resource}/{id}/like` for one entity type.
pub struct RestContentRepository<T> {
    client: Arc<ApiClient>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RestContentRepository<T> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn resource(&self) -> &'static str {
        T::RESOURCE.path()
    }
}

#[async_trait]
impl<T: Entity> CollectionSource<T> for RestContentRepository<T> {
    async fn fetch(&self, filter: &Filter) -> Result<Vec<T>> {
        tracing::debug!(resource = self.resource(), ?filter, "fetching collection");
        self.client
            .get(&[self.resource()], &filter.query_pairs())
            .await?
            .into_data(self.resource())
    }
}

#[async_trait]
impl<T: Entity> ContentRepository<T> for RestContentRepository<T> {
    async fn find_by_id(&self, id: &str) -> Result<T> {
        self.client
            .get(&[self.resource(), id], &[])
            .await
            .map_err(|e| match e {
                SpeakupError::NotFound { .. } => SpeakupError::not_found(T::ENTITY_TYPE, id),
                other => other,
            })?
            .into_data(T::ENTITY_TYPE)
    }

    async fn create(&self, draft: &T::Draft) -> Result<T> {
        self.client
            .post(&[self.resource()], Some(draft), Access::Bearer)
            .await?
            .into_data(self.resource())
    }

    async fn categories(&self) -> Result<Vec<CategoryInfo>> {
        self.client
            .get(&[self.resource(), "categories"], &[])
            .await?
            .into_data("categories")
    }
}

#[async_trait]
impl<T: Entity> LikeRepository for RestContentRepository<T> {
    async fn like(&self, id: &str) -> Result<LikeReceipt> {
        self.client
            .post::<(), LikeReceipt>(&[self.resource(), id, "like"], None, Access::Bearer)
            .await
            .map_err(|e| match e {
                SpeakupError::NotFound { .. } => SpeakupError::not_found(T::ENTITY_TYPE, id),
                other => other,
            })?
            .into_data("like")
    }
}
