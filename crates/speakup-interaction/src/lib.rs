//! HTTP layer for the SpeakUp client.
//!
//! [`ApiClient`] owns the base URL, the bearer-token interceptor and the
//! status-to-error mapping. The `Rest*` types implement the repository and
//! auth traits from `speakup-core` on top of it.

mod auth;
mod client;
mod community;
mod content;
mod envelope;
mod scripts;

pub use auth::RestAuthApi;
pub use client::{Access, ApiClient};
pub use community::RestCommunityRepository;
pub use content::RestContentRepository;
pub use scripts::RestScriptRepository;
