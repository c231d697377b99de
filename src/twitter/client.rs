//! The Twitter API client service object.

use reqwest::Client;

use super::error::TwitterError;
use super::queue::ThrottledQueue;
use super::users::ResolvedAccount;
use crate::cache::TtlCache;
use crate::config::TwitterConfig;

/// Rate-limited Twitter/X API client.
///
/// Owns the throttled request queue, the account and follow caches and the
/// underlying HTTP client. Create one at application start and share it
/// (typically behind an `Arc`); every clone of the handle sees the same queue
/// and caches, so the throttle applies process-wide.
///
/// # Example
///
/// ```rust,no_run
/// use followcheck::{TwitterClient, TwitterConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = TwitterConfig::from_env();
///     let target = config.target.clone();
///     let client = TwitterClient::new(config);
///     match client.is_following("jack", &target).await {
///         Ok(follows) => println!("follows: {}", follows),
///         Err(e) => eprintln!("check failed: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct TwitterClient {
    pub(crate) config: TwitterConfig,
    pub(crate) http: Client,
    pub(crate) queue: ThrottledQueue,
    pub(crate) accounts: TtlCache<String, ResolvedAccount>,
    pub(crate) follows: TtlCache<String, bool>,
}

impl TwitterClient {
    /// Builds the client and starts its queue worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: TwitterConfig) -> Self {
        let queue = ThrottledQueue::new(config.min_interval);
        Self {
            config,
            http: Client::new(),
            queue,
            accounts: TtlCache::new(),
            follows: TtlCache::new(),
        }
    }

    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    /// Returns the bearer token or a configuration error when it is missing.
    pub(crate) fn bearer_token(&self) -> Result<&str, TwitterError> {
        self.config
            .bearer_token
            .as_deref()
            .ok_or_else(|| TwitterError::Configuration("TWITTER_BEARER_TOKEN is not set".into()))
    }
}
