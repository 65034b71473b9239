//! Bearer token plumbing shared between the session manager and the HTTP
//! layer.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

/// The single well-known key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

/// The token currently attached to outgoing requests.
///
/// Written only by the session manager, read by the HTTP client on every
/// request.
#[derive(Default)]
pub struct BearerToken {
    value: RwLock<Option<String>>,
}

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<String> {
        self.value.read().await.clone()
    }

    pub async fn set(&self, token: Option<String>) {
        *self.value.write().await = token;
    }
}

/// Client-local persistent storage holding at most one token.
///
/// Calls are synchronous so the session manager can perform them inside the
/// same critical section as the in-memory transition.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when the key is absent.
    fn load(&self) -> Result<Option<String>>;

    /// Stores `token`, replacing any previous value.
    fn save(&self, token: &str) -> Result<()>;

    /// Removes the key. Removing an absent key is not an error.
    fn clear(&self) -> Result<()>;
}

/// Receives every 401 answered to a request that carried a bearer token.
#[async_trait]
pub trait UnauthorizedHook: Send + Sync {
    /// `rejected_token` is the token the failing request was sent with.
    async fn on_unauthorized(&self, rejected_token: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bearer_token_set_and_clear() {
        let token = BearerToken::new();
        assert!(token.get().await.is_none());

        token.set(Some("abc".into())).await;
        assert_eq!(token.get().await.as_deref(), Some("abc"));

        token.set(None).await;
        assert!(token.get().await.is_none());
    }

    #[test]
    fn test_token_key_is_stable() {
        assert_eq!(TOKEN_KEY, "token");
    }
}
