//! Aggregate counters and practice-tool summaries.

use serde::{Deserialize, Serialize};

/// Counters shown on the success-stories page (`GET /stats`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunityStats {
    pub total_stories: u64,
    pub total_likes: u64,
    pub empowered_percentage: u64,
}

impl CommunityStats {
    pub fn record_story_created(&mut self) {
        self.total_stories += 1;
    }

    /// Adjusts the like total by what the server says happened.
    pub fn record_like(&mut self, action: LikeAction) {
        match action {
            LikeAction::Liked => self.total_likes += 1,
            LikeAction::Unliked => self.total_likes = self.total_likes.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

/// Answer of `POST /{resource}/{id}/like`.
///
/// Only `likes` is guaranteed; older endpoints omit the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeReceipt {
    pub likes: u64,
    #[serde(default)]
    pub has_liked: Option<bool>,
    #[serde(default)]
    pub action: Option<LikeAction>,
}

/// Item counts behind the practice-tools page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsSummary {
    pub total_phrases: u64,
    pub total_affirmations: u64,
    pub total_scripts: u64,
}
