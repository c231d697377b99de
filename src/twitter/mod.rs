//! Twitter/X API integration module.
//!
//! This module contains the rate-limited client used to resolve usernames and
//! verify follow relationships with the Twitter/X API v2, using OAuth 2.0 Bearer
//! Token authentication.

mod api;
mod client;
mod error;
mod following;
mod parsing;
mod queue;
mod users;

// Re-export public API
pub use api::build_bearer_auth_header;
pub use client::TwitterClient;
pub use error::TwitterError;
pub use parsing::{validate_username, InvalidUsername};
pub use queue::ThrottledQueue;
pub use users::ResolvedAccount;

// Crate-internal re-exports (used by tests)
#[cfg(test)]
pub(crate) use api::{rate_limit_wait_ms, sanitize_for_logging, DEFAULT_RATE_LIMIT_WAIT_MS};
#[cfg(test)]
pub(crate) use following::follow_cache_key;
#[cfg(test)]
pub(crate) use parsing::normalize_username;
