use speakup_core::content::{
    CommunityRepository, CommunityStats, LikeAction, NewStory, Story,
};
use speakup_core::{Result, SpeakupError};
use std::sync::Arc;
use tokio::sync::watch;

use super::board::ContentBoard;
use crate::collection::FetchOutcome;

/// The success-stories page: a story board plus the community counters
/// shown above it.
pub struct StoryBoard {
    board: ContentBoard<Story>,
    community: Arc<dyn CommunityRepository>,
    stats: watch::Sender<CommunityStats>,
}

impl StoryBoard {
    pub fn new(board: ContentBoard<Story>, community: Arc<dyn CommunityRepository>) -> Self {
        let (stats, _) = watch::channel(CommunityStats::default());
        Self {
            board,
            community,
            stats,
        }
    }

    pub fn board(&self) -> &ContentBoard<Story> {
        &self.board
    }

    pub fn stats(&self) -> CommunityStats {
        self.stats.borrow().clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<CommunityStats> {
        self.stats.subscribe()
    }

    /// Fetches stories and counters together. Missing counters fall back
    /// to the last known values.
    pub async fn load(&self) -> Result<FetchOutcome> {
        let (stories, _) = tokio::join!(self.board.load(), self.refresh_stats());
        stories
    }

    pub async fn refresh_stats(&self) -> bool {
        match self.community.stats().await {
            Ok(stats) => {
                self.stats.send_replace(stats);
                true
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), error = %e, "community stats unavailable");
                false
            }
        }
    }

    /// Toggles the like on `id` and moves the like total the way the
    /// server reports.
    pub async fn toggle_like(&self, id: &str) -> Result<Story> {
        let (story, receipt) = self.board.toggle_like(id).await?;
        let action = receipt.action.unwrap_or(if story.has_liked {
            LikeAction::Liked
        } else {
            LikeAction::Unliked
        });
        self.stats.send_modify(|s| s.record_like(action));
        Ok(story)
    }

    /// Shares a new story.
    ///
    /// # Errors
    ///
    /// `Validation` without a request when the situation, what was said or
    /// the outcome is blank.
    pub async fn share(&self, draft: &NewStory) -> Result<Story> {
        validate(draft)?;
        let story = self.board.create(draft).await?;
        self.stats.send_modify(CommunityStats::record_story_created);
        Ok(story)
    }
}

fn validate(draft: &NewStory) -> Result<()> {
    let required = [
        ("situation", &draft.situation),
        ("what you said", &draft.what_i_said),
        ("outcome", &draft.outcome),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(SpeakupError::validation(format!("Please fill in the {field}"))),
        None => Ok(()),
    }
}
