use speakup_core::content::{CommunityRepository, ToolsSummary};
use std::sync::Arc;

/// Counters on the practice-tools page.
pub struct ToolsOverview {
    community: Arc<dyn CommunityRepository>,
}

impl ToolsOverview {
    pub fn new(community: Arc<dyn CommunityRepository>) -> Self {
        Self { community }
    }

    /// Never fails; unavailable counts read as zero.
    pub async fn summary(&self) -> ToolsSummary {
        self.community.tools_summary().await.unwrap_or_else(|e| {
            tracing::warn!(kind = ?e.kind(), error = %e, "tool counts unavailable");
            ToolsSummary::default()
        })
    }
}
