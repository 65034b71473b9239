//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the session snapshot and its status enum
//! - `token`: the bearer-token cell shared with the HTTP layer, token
//!   persistence and the 401 hook
//! - `api`: the authentication endpoints consumed by the session manager

mod api;
mod model;
mod token;

pub use api::AuthApi;
pub use model::{Session, SessionStatus};
pub use token::{BearerToken, TOKEN_KEY, TokenStore, UnauthorizedHook};
