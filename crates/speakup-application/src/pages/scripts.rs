//! Script pages: scenario detail, saved scripts and the quick-help
//! generator.

use async_trait::async_trait;
use speakup_core::content::{
    CollectionSource, ContentRepository, Filter, GeneratedScript, Scenario, Script,
    ScriptRepository, ScriptRequest, Tone,
};
use speakup_core::{Result, SpeakupError};
use std::sync::Arc;

use crate::collection::{CollectionView, FetchOutcome};
use crate::session::SessionManager;

/// A scenario with the scripts written for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDetail {
    pub scenario: Scenario,
    pub scripts: Vec<Script>,
}

impl ScenarioDetail {
    /// Fetches the scenario and its scripts concurrently.
    pub async fn load(
        scenarios: &dyn ContentRepository<Scenario>,
        scripts: &dyn ScriptRepository,
        scenario_id: &str,
    ) -> Result<Self> {
        let (scenario, scripts) = tokio::try_join!(
            scenarios.find_by_id(scenario_id),
            scripts.for_scenario(scenario_id),
        )?;
        Ok(Self { scenario, scripts })
    }
}

/// `GET /scripts/saved`, which ignores the filter.
struct SavedScriptSource(Arc<dyn ScriptRepository>);

#[async_trait]
impl CollectionSource<Script> for SavedScriptSource {
    async fn fetch(&self, _filter: &Filter) -> Result<Vec<Script>> {
        self.0.saved().await
    }
}

/// The signed-in user's saved scripts.
pub struct SavedScripts {
    view: CollectionView<Script>,
    scripts: Arc<dyn ScriptRepository>,
    session: Arc<SessionManager>,
}

impl SavedScripts {
    pub fn new(scripts: Arc<dyn ScriptRepository>, session: Arc<SessionManager>) -> Self {
        let source = Arc::new(SavedScriptSource(scripts.clone()));
        Self {
            view: CollectionView::new(source),
            scripts,
            session,
        }
    }

    pub fn view(&self) -> &CollectionView<Script> {
        &self.view
    }

    pub async fn load(&self) -> Result<FetchOutcome> {
        self.session.require_authenticated()?;
        self.view.load().await
    }

    pub async fn save(&self, script_id: &str) -> Result<()> {
        self.session.require_authenticated()?;
        self.scripts.save(script_id).await?;
        tracing::debug!(script_id, "script saved");
        Ok(())
    }

    /// Removes `script_id` from the list at once; it reappears if the
    /// server refuses.
    pub async fn unsave(&self, script_id: &str) -> Result<()> {
        self.session.require_authenticated()?;
        self.view
            .remove_optimistic(script_id, || self.scripts.unsave(script_id))
            .await
    }

    pub fn close(&self) {
        self.view.close();
    }
}

/// Quick-help script generation.
pub struct ScriptGenerator {
    scripts: Arc<dyn ScriptRepository>,
}

impl ScriptGenerator {
    pub fn new(scripts: Arc<dyn ScriptRepository>) -> Self {
        Self { scripts }
    }

    /// # Errors
    ///
    /// `Validation` without a request for a blank situation or an unknown
    /// tone.
    pub async fn generate(&self, situation: &str, tone: &str) -> Result<GeneratedScript> {
        let situation = situation.trim();
        if situation.is_empty() {
            return Err(SpeakupError::validation("Describe the situation first"));
        }
        let tone: Tone = tone.parse().map_err(SpeakupError::validation)?;
        self.scripts
            .generate(&ScriptRequest {
                situation: situation.to_string(),
                tone,
            })
            .await
    }
}
