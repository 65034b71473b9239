use async_trait::async_trait;
use speakup_core::session::{AuthApi, BearerToken, Session, TokenStore, UnauthorizedHook};
use speakup_core::user::{AuthPayload, Credentials, Identity, Registration};
use speakup_core::{Result, SpeakupError};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Owns the authentication lifecycle of the client.
///
/// `SessionManager` is responsible for:
/// - Restoring a persisted token on startup and verifying it
/// - Login, registration and logout
/// - Invalidating the session when the backend rejects the current token
/// - Publishing every transition as a whole [`Session`] snapshot
///
/// One instance is built by the composition root and shared by `Arc`.
/// Every transition runs under `transition_lock`, and the token store is
/// written inside the same critical section as the published
/// snapshot, so no observer sees memory and persistence disagree.
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    bearer: Arc<BearerToken>,
    state: watch::Sender<Session>,
    transition_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates an unauthenticated manager.
    ///
    /// # Arguments
    ///
    /// * `auth` - The `/auth/*` endpoints
    /// * `store` - Persistent storage for the session token
    /// * `bearer` - The token cell read by the HTTP client
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>, bearer: Arc<BearerToken>) -> Self {
        let (state, _) = watch::channel(Session::unauthenticated());
        Self {
            auth,
            store,
            bearer,
            state,
            transition_lock: Mutex::new(()),
        }
    }

    /// Restores the session from the token store.
    ///
    /// Without a stored token the session settles on `Unauthenticated` and
    /// no request is made. Otherwise the session is `Loading` while the
    /// token is checked against the profile endpoint. A rejected or
    /// unverifiable token is removed and the session ends `Unauthenticated`;
    /// that outcome is not an error.
    ///
    /// The verification result is applied only if the session is still
    /// loading the same token, so a login or logout that happened meanwhile
    /// wins.
    pub async fn initialize(&self) -> Session {
        let token = {
            let _guard = self.transition_lock.lock().await;
            let stored = self
                .store
                .load()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "token store unreadable; starting signed out");
                    None
                })
                .filter(|token| !token.is_empty());
            let current = self.snapshot();
            match stored {
                Some(token) if current.is_authenticated() && current.holds_token(&token) => {
                    tracing::debug!("session already verified");
                    return current;
                }
                Some(token) => {
                    self.publish(Session::loading(token.clone())).await;
                    token
                }
                None => {
                    tracing::debug!("no stored token");
                    self.publish(Session::unauthenticated()).await;
                    return self.snapshot();
                }
            }
        };

        tracing::debug!("verifying stored token");
        let verification = self.auth.profile().await;

        let _guard = self.transition_lock.lock().await;
        let current = self.snapshot();
        if !(current.is_loading() && current.holds_token(&token)) {
            tracing::debug!(status = ?current.status(), "session changed during verification; result dropped");
            return current;
        }

        match verification {
            Ok(identity) => {
                tracing::info!(user_id = %identity.id, "session restored");
                self.publish(Session::authenticated(token, identity)).await;
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), error = %e, "stored token rejected");
                self.invalidate_locked().await;
            }
        }
        self.snapshot()
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend error (`Unauthorized` for bad credentials) or a
    /// `Storage` error when the token cannot be persisted. The session is
    /// unchanged in both cases.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let payload = self
            .auth
            .login(&Credentials::new(email, password))
            .await
            .inspect_err(|e| tracing::warn!(kind = ?e.kind(), "login failed"))?;
        self.establish(&payload).await?;
        tracing::info!(user_id = %payload.identity.id, "logged in");
        Ok(payload)
    }

    /// Creates an account and signs in with it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`]; a taken email surfaces as the
    /// backend's `Validation` error.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthPayload> {
        let payload = self
            .auth
            .register(&Registration::new(name, email, password))
            .await
            .inspect_err(|e| tracing::warn!(kind = ?e.kind(), "registration failed"))?;
        self.establish(&payload).await?;
        tracing::info!(user_id = %payload.identity.id, "registered");
        Ok(payload)
    }

    /// Signs out locally, telling the backend on a best-effort basis.
    ///
    /// Never fails: a server-side error is logged and the local session is
    /// cleared regardless. If a newer login replaced the token while the
    /// server call was in flight, that newer session is kept.
    pub async fn logout(&self) {
        let token = self.snapshot().token().map(str::to_string);

        if token.is_some()
            && let Err(e) = self.auth.logout().await
        {
            tracing::warn!(kind = ?e.kind(), error = %e, "server logout failed; clearing local session anyway");
        }

        let _guard = self.transition_lock.lock().await;
        let current = self.snapshot();
        let superseded = match (current.token(), token.as_deref()) {
            (Some(now), Some(then)) => now != then,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if superseded {
            tracing::debug!("newer session established during logout; keeping it");
            return;
        }

        self.forget_stored_token();
        self.publish(Session::unauthenticated()).await;
        tracing::info!("logged out");
    }

    /// Whether the latest snapshot is `Authenticated`.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receives every transition as a complete snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns the signed-in identity, or `Unauthorized` when nobody is
    /// signed in. Gate for likes, submissions and saved scripts.
    pub fn require_authenticated(&self) -> Result<Identity> {
        self.identity()
            .ok_or_else(|| SpeakupError::unauthorized("login required"))
    }

    async fn establish(&self, payload: &AuthPayload) -> Result<()> {
        let _guard = self.transition_lock.lock().await;
        self.store.save(&payload.token).map_err(|e| {
            tracing::error!(error = %e, "failed to persist session token");
            SpeakupError::storage(format!("Could not save session: {e}"))
        })?;
        self.publish(Session::authenticated(payload.token.clone(), payload.identity.clone()))
            .await;
        Ok(())
    }

    /// Removes the stored token and walks `Invalid -> Unauthenticated`.
    /// Caller holds `transition_lock`.
    async fn invalidate_locked(&self) {
        self.forget_stored_token();
        self.publish(Session::invalid()).await;
        self.publish(Session::unauthenticated()).await;
    }

    /// Removes the persisted token. A store that cannot delete gets the
    /// key blanked instead, which `initialize` treats as absent.
    fn forget_stored_token(&self) {
        let Err(e) = self.store.clear() else {
            return;
        };
        tracing::warn!(error = %e, "failed to remove stored token; blanking it");
        if let Err(e) = self.store.save("") {
            tracing::error!(error = %e, "stored token could not be blanked");
        }
    }

    async fn publish(&self, session: Session) {
        // The HTTP client must see the new token before any subscriber reacts.
        self.bearer.set(session.token().map(str::to_string)).await;
        tracing::debug!(status = ?session.status(), "session transition");
        self.state.send_replace(session);
    }
}

#[async_trait]
impl UnauthorizedHook for SessionManager {
    async fn on_unauthorized(&self, rejected_token: &str) {
        let _guard = self.transition_lock.lock().await;
        let current = self.snapshot();
        if !current.holds_token(rejected_token) {
            tracing::debug!("401 for a token that is no longer current; ignored");
            return;
        }
        // A pending verification handles its own rejection in `initialize`.
        if current.is_loading() {
            return;
        }
        tracing::warn!("backend rejected the session token; signing out");
        self.invalidate_locked().await;
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
