//! Authentication endpoints trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::user::{AuthPayload, Credentials, Identity, Registration};

/// The backend's authentication surface.
///
/// `login` and `register` are sent without a bearer token; `logout` and
/// `profile` carry whatever token is current.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<AuthPayload>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload>;

    /// Best-effort server-side invalidation.
    async fn logout(&self) -> Result<()>;

    /// Identity behind the current token.
    async fn profile(&self) -> Result<Identity>;
}
