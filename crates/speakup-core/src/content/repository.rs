//! Content repository traits.
//!
//! Implemented over HTTP by the interaction crate and by in-memory doubles
//! in tests.

use async_trait::async_trait;

use super::community::{CommunityStats, LikeReceipt, ToolsSummary};
use super::filter::Filter;
use super::model::{CategoryInfo, Entity, GeneratedScript, Script, ScriptRequest};
use crate::error::Result;

/// A readable, filterable remote collection.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn fetch(&self, filter: &Filter) -> Result<Vec<T>>;
}

/// Full CRUD-ish surface of a content resource.
#[async_trait]
pub trait ContentRepository<T: Entity>: CollectionSource<T> {
    async fn find_by_id(&self, id: &str) -> Result<T>;

    async fn create(&self, draft: &T::Draft) -> Result<T>;

    async fn categories(&self) -> Result<Vec<CategoryInfo>>;
}

/// `POST /{resource}/{id}/like`, which toggles the caller's like.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn like(&self, id: &str) -> Result<LikeReceipt>;
}

#[async_trait]
pub trait ScriptRepository: Send + Sync {
    async fn generate(&self, request: &ScriptRequest) -> Result<GeneratedScript>;

    async fn for_scenario(&self, scenario_id: &str) -> Result<Vec<Script>>;

    async fn saved(&self) -> Result<Vec<Script>>;

    async fn save(&self, script_id: &str) -> Result<()>;

    async fn unsave(&self, script_id: &str) -> Result<()>;
}

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn stats(&self) -> Result<CommunityStats>;

    async fn tools_summary(&self) -> Result<ToolsSummary>;
}
