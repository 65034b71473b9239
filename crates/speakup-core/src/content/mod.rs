//! Content domain module.
//!
//! Scenarios, success stories, tips and scripts, plus the traits the
//! application layer uses to read and write them.
//!
//! # Module Structure
//!
//! - `filter`: collection filter (category + search term) and resource paths
//! - `model`: entity models and their drafts
//! - `community`: aggregate counters and practice-tool summaries
//! - `repository`: repository traits implemented by the HTTP layer

mod community;
mod filter;
mod model;
mod repository;

pub use community::{CommunityStats, LikeAction, LikeReceipt, ToolsSummary};
pub use filter::{Filter, ResourceKind};
pub use model::{
    CategoryInfo, Entity, GeneratedScript, Identifiable, Likeable, NewScenario, NewStory, NewTip,
    Scenario, ScenarioRef, Script, ScriptRequest, Story, Tip, Tone,
};
pub use repository::{
    CollectionSource, CommunityRepository, ContentRepository, LikeRepository, ScriptRepository,
};
