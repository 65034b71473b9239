//! Composition root shared by every front end.

use speakup_core::config::ClientConfig;
use speakup_core::content::{Scenario, Story, Tip};
use speakup_core::session::{BearerToken, TokenStore, UnauthorizedHook};
use speakup_core::Result;
use speakup_infrastructure::{ConfigService, FileTokenStore, SpeakupPaths};
use speakup_interaction::{
    ApiClient, RestAuthApi, RestCommunityRepository, RestContentRepository, RestScriptRepository,
};
use std::sync::{Arc, Weak};

use crate::pages::{
    ContentBoard, SavedScripts, ScenarioDetail, ScriptGenerator, StoryBoard, ToolsOverview,
};
use crate::session::SessionManager;

/// Wires the HTTP client, the token store and the session manager
/// together and hands out page facades.
///
/// Only the session manager and the token cell inside the HTTP client are
/// shared between pages; every board owns its own collection state.
pub struct AppContext {
    config: ClientConfig,
    client: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl AppContext {
    /// Loads `config.toml` and the session file from `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is malformed, the config
    /// directory cannot be resolved, or the API URL is invalid.
    pub fn bootstrap(paths: &SpeakupPaths) -> Result<Self> {
        let config = ConfigService::new(paths)?.get_config()?;
        let store = Arc::new(FileTokenStore::new(paths)?);
        Self::with_store(config, store)
    }

    /// Builds the context around an explicit token store.
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let bearer = Arc::new(BearerToken::new());
        let client = Arc::new(ApiClient::new(&config, bearer.clone())?);
        let auth = Arc::new(RestAuthApi::new(client.clone()));
        let session = Arc::new(SessionManager::new(auth, store, bearer));

        let hook: Weak<dyn UnauthorizedHook> = Arc::downgrade(&session) as Weak<dyn UnauthorizedHook>;
        client.set_unauthorized_hook(hook);

        tracing::debug!(api_url = %config.api_url, "client context ready");
        Ok(Self {
            config,
            client,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn scenarios(&self) -> ContentBoard<Scenario> {
        ContentBoard::new(self.content::<Scenario>(), self.session.clone())
    }

    pub fn stories(&self) -> StoryBoard {
        let repository = self.content::<Story>();
        let board = ContentBoard::new(repository.clone(), self.session.clone()).with_likes(repository);
        StoryBoard::new(board, self.community())
    }

    pub fn tips(&self) -> ContentBoard<Tip> {
        let repository = self.content::<Tip>();
        ContentBoard::new(repository.clone(), self.session.clone()).with_likes(repository)
    }

    pub async fn scenario_detail(&self, scenario_id: &str) -> Result<ScenarioDetail> {
        let scenarios = self.content::<Scenario>();
        let scripts = self.scripts();
        ScenarioDetail::load(scenarios.as_ref(), scripts.as_ref(), scenario_id).await
    }

    pub fn saved_scripts(&self) -> SavedScripts {
        SavedScripts::new(self.scripts(), self.session.clone())
    }

    pub fn script_generator(&self) -> ScriptGenerator {
        ScriptGenerator::new(self.scripts())
    }

    pub fn tools(&self) -> ToolsOverview {
        ToolsOverview::new(self.community())
    }

    fn content<T: speakup_core::content::Entity>(&self) -> Arc<RestContentRepository<T>> {
        Arc::new(RestContentRepository::new(self.client.clone()))
    }

    fn scripts(&self) -> Arc<RestScriptRepository> {
        Arc::new(RestScriptRepository::new(self.client.clone()))
    }

    fn community(&self) -> Arc<RestCommunityRepository> {
        Arc::new(RestCommunityRepository::new(self.client.clone()))
    }
}
