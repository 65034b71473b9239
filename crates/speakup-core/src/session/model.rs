//! Session snapshot model.

use serde::{Deserialize, Serialize};

use crate::user::Identity;

/// Where the client stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No token, nobody logged in.
    Unauthenticated,
    /// A previously stored token is being verified against the profile
    /// endpoint.
    Loading,
    /// Token verified or freshly issued; identity known.
    Authenticated,
    /// The token was rejected. Transient: always followed by
    /// `Unauthenticated`.
    Invalid,
}

/// An immutable view of the session at one point in time.
///
/// Fields are private so the invariants hold by construction:
/// `identity` is present iff the status is `Authenticated`, and `token` is
/// present iff the status is `Loading` or `Authenticated`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    token: Option<String>,
    identity: Option<Identity>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            token: None,
            identity: None,
        }
    }

    pub fn loading(token: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Loading,
            token: Some(token.into()),
            identity: None,
        }
    }

    pub fn authenticated(token: impl Into<String>, identity: Identity) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            token: Some(token.into()),
            identity: Some(identity),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: SessionStatus::Invalid,
            token: None,
            identity: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Whether this session currently holds exactly `token`.
    pub fn holds_token(&self, token: &str) -> bool {
        self.token.as_deref() == Some(token)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

// Manual impl keeps the token out of Debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("identity", &self.identity)
            .finish()
    }
}
