//! # Followcheck Library
//!
//! A rate-limited Twitter/X follow verification client. It resolves usernames to
//! accounts and checks whether one account follows another through the Twitter
//! API v2, without getting the application banned by the API's rate limits.
//!
//! ## Features
//!
//! - Single-lane throttled request queue (at most one call in flight, minimum spacing between calls)
//! - Bounded automatic retry on HTTP 429 driven by `retry-after` / `x-rate-limit-reset`
//! - TTL caches for account lookups and follow verdicts
//! - Bounded cursor pagination with early exit over following lists
//! - HTTP endpoints for the surrounding system (`/health`, `/twitter/...`)
//! - Structured logging
//!
//! ## Configuration
//!
//! - `TWITTER_BEARER_TOKEN`: Bearer Token; without it every call fails with a configuration error
//! - `ANALYZER_TWITTER_ID` / `ANALYZER_TWITTER_USERNAME`: default follow target
//! - `PORT`: Server port (defaults to 3000)
//!
//! See [`TwitterConfig::from_env`] for the throttling and caching knobs.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_server_port, FollowTarget, TwitterConfig};
pub use handlers::{build_router, handle_health, AppState};
pub use twitter::{
    build_bearer_auth_header, validate_username, InvalidUsername, ResolvedAccount, TwitterClient,
    TwitterError,
};
