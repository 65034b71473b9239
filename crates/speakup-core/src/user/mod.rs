//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: authenticated identity and auth payloads

mod model;

pub use model::{AuthPayload, Credentials, Identity, Registration};
