//! `/auth/*` endpoints.

use async_trait::async_trait;
use serde_json::Value;
use speakup_core::Result;
use speakup_core::session::AuthApi;
use speakup_core::user::{AuthPayload, Credentials, Identity, Registration};
use std::sync::Arc;

use crate::client::{Access, ApiClient};

pub struct RestAuthApi {
    client: Arc<ApiClient>,
}

impl RestAuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for RestAuthApi {
    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.client
            .post(&["auth", "register"], Some(registration), Access::Anonymous)
            .await?
            .into_data("register")
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        self.client
            .post(&["auth", "login"], Some(credentials), Access::Anonymous)
            .await?
            .into_data("login")
    }

    async fn logout(&self) -> Result<()> {
        self.client
            .post::<(), Value>(&["auth", "logout"], None, Access::Bearer)
            .await
            .map(|_| ())
    }

    async fn profile(&self) -> Result<Identity> {
        self.client
            .get(&["auth", "profile"], &[])
            .await?
            .into_data("profile")
    }
}
