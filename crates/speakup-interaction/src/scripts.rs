//! `/scripts/*` endpoints.

use async_trait::async_trait;
use serde_json::Value;
use speakup_core::Result;
use speakup_core::content::{
    GeneratedScript, ResourceKind, Script, ScriptRepository, ScriptRequest,
};
use std::sync::Arc;

use crate::client::{Access, ApiClient};

const SCRIPTS: &str = ResourceKind::Scripts.path();

pub struct RestScriptRepository {
    client: Arc<ApiClient>,
}

impl RestScriptRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScriptRepository for RestScriptRepository {
    async fn generate(&self, request: &ScriptRequest) -> Result<GeneratedScript> {
        self.client
            .post(&[SCRIPTS, "generate"], Some(request), Access::Bearer)
            .await?
            .into_data("generate")
    }

    async fn for_scenario(&self, scenario_id: &str) -> Result<Vec<Script>> {
        self.client
            .get(&[SCRIPTS, "scenario", scenario_id], &[])
            .await?
            .into_data("scenario scripts")
    }

    async fn saved(&self) -> Result<Vec<Script>> {
        self.client
            .get(&[SCRIPTS, "saved"], &[])
            .await?
            .into_data("saved scripts")
    }

    async fn save(&self, script_id: &str) -> Result<()> {
        self.client
            .post::<(), Value>(&[SCRIPTS, "save", script_id], None, Access::Bearer)
            .await
            .map(|_| ())
    }

    async fn unsave(&self, script_id: &str) -> Result<()> {
        self.client
            .delete::<Value>(&[SCRIPTS, "save", script_id])
            .await
            .map(|_| ())
    }
}
