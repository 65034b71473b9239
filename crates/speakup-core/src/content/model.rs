//! Content entity models.
//!
//! Wire names follow the backend's camelCase JSON with `_id` identifiers.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::community::LikeReceipt;
use super::filter::ResourceKind;

/// Anything a collection view can address by id.
pub trait Identifiable: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// A backend resource with its own list/detail/create endpoints.
pub trait Entity: Identifiable + DeserializeOwned {
    /// Body of `POST /{resource}`.
    type Draft: Serialize + Send + Sync;

    const RESOURCE: ResourceKind;

    /// Name used in `NotFound` errors.
    const ENTITY_TYPE: &'static str;
}

/// Entities with a like counter.
pub trait Likeable: Identifiable {
    fn likes(&self) -> u64;

    fn has_liked(&self) -> bool;

    fn set_like_state(&mut self, likes: u64, has_liked: bool);

    /// The optimistic guess for a like/unlike click.
    fn toggled(&self) -> Self {
        let mut next = self.clone();
        if self.has_liked() {
            next.set_like_state(self.likes().saturating_sub(1), false);
        } else {
            next.set_like_state(self.likes() + 1, true);
        }
        next
    }

    /// Replaces the local guess with the server's numbers.
    fn reconciled(&self, receipt: &LikeReceipt) -> Self {
        let mut next = self.clone();
        let has_liked = receipt.has_liked.unwrap_or_else(|| self.has_liked());
        next.set_like_state(receipt.likes, has_liked);
        next
    }
}

/// A category as listed by `GET /{resource}/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

// ============================================================================
// Scenarios
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScenario {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Identifiable for Scenario {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Scenario {
    type Draft = NewScenario;
    const RESOURCE: ResourceKind = ResourceKind::Scenarios;
    const ENTITY_TYPE: &'static str = "Scenario";
}

// ============================================================================
// Success stories
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    pub situation: String,
    #[serde(rename = "whatISaid")]
    pub what_i_said: String,
    pub outcome: String,
    #[serde(default)]
    pub feeling: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub has_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStory {
    pub situation: String,
    #[serde(rename = "whatISaid")]
    pub what_i_said: String,
    pub outcome: String,
    pub feeling: String,
    pub category: String,
}

impl Default for NewStory {
    fn default() -> Self {
        Self {
            situation: String::new(),
            what_i_said: String::new(),
            outcome: String::new(),
            feeling: "proud".to_string(),
            category: "general".to_string(),
        }
    }
}

impl Identifiable for Story {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Story {
    type Draft = NewStory;
    const RESOURCE: ResourceKind = ResourceKind::Stories;
    const ENTITY_TYPE: &'static str = "Story";
}

impl Likeable for Story {
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

// ============================================================================
// Tips
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub has_liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTip {
    pub category: String,
    pub content: String,
}

impl NewTip {
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
        }
    }
}

impl Identifiable for Tip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Tip {
    type Draft = NewTip;
    const RESOURCE: ResourceKind = ResourceKind::Tips;
    const ENTITY_TYPE: &'static str = "Tip";
}

impl Likeable for Tip {
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

// ============================================================================
// Scripts
// ============================================================================

/// Scenario reference on a script: either a bare id or a populated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioRef {
    Summary {
        #[serde(rename = "_id")]
        id: String,
        title: String,
    },
    Id(String),
}

impl ScenarioRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            ScenarioRef::Summary { title, .. } => Some(title),
            ScenarioRef::Id(_) => None,
        }
    }
}

/// A stored script (per scenario, or in the user's saved list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioRef>,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub opening_line: String,
    #[serde(default)]
    pub body_script: String,
    #[serde(default)]
    pub closing_line: String,
}

impl Script {
    /// Title shown on saved-script cards.
    pub fn display_title(&self) -> &str {
        self.scenario
            .as_ref()
            .and_then(ScenarioRef::title)
            .unwrap_or("Custom Script")
    }
}

impl Identifiable for Script {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Tones offered by the quick-help generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Calm,
    Friendly,
    Firm,
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calm" => Ok(Tone::Calm),
            "friendly" => Ok(Tone::Friendly),
            "firm" => Ok(Tone::Firm),
            other => Err(format!("unknown tone '{other}' (expected calm, friendly or firm)")),
        }
    }
}

/// Body of `POST /scripts/generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptRequest {
    pub situation: String,
    pub tone: Tone,
}

/// Answer of `POST /scripts/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScript {
    pub full_script: String,
    #[serde(default)]
    pub quick_reminders: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub body_language_tips: Vec<String>,
    #[serde(default)]
    pub do_not: Vec<String>,
}
