//! `/stats` and `/tools/*` endpoints.

use async_trait::async_trait;
use serde_json::Value;
use speakup_core::Result;
use speakup_core::content::{CommunityRepository, CommunityStats, ToolsSummary};
use std::sync::Arc;

use crate::client::ApiClient;

pub struct RestCommunityRepository {
    client: Arc<ApiClient>,
}

impl RestCommunityRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Size of a `/tools/{name}` list, preferring the envelope's `count`.
    async fn tool_count(&self, name: &str) -> Result<u64> {
        let envelope = self.client.get::<Vec<Value>>(&["tools", name], &[]).await?;
        let listed = envelope.data.as_ref().map_or(0, |items| items.len() as u64);
        Ok(envelope.count.unwrap_or(listed))
    }
}

#[async_trait]
impl CommunityRepository for RestCommunityRepository {
    async fn stats(&self) -> Result<CommunityStats> {
        self.client.get(&["stats"], &[]).await?.into_data("stats")
    }

    async fn tools_summary(&self) -> Result<ToolsSummary> {
        let (total_phrases, total_affirmations, total_scripts) = tokio::try_join!(
            self.tool_count("phrases"),
            self.tool_count("affirmations"),
            self.tool_count("scripts"),
        )?;
        Ok(ToolsSummary {
            total_phrases,
            total_affirmations,
            total_scripts,
        })
    }
}
