//! Configuration module for the followcheck service.
//!
//! This module contains configuration structures and environment variable handling
//! for the Twitter/X API integration.

use log::{debug, info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Largest `max_results` the following endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// The account whose followers are being verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowTarget {
    /// Numeric account id of the target
    pub id: String,
    /// Target handle, when known. Matched case-insensitively against follow list entries.
    pub handle: Option<String>,
}

impl FollowTarget {
    pub fn new(id: impl Into<String>, handle: Option<&str>) -> Self {
        Self {
            id: id.into(),
            handle: handle.map(str::to_string),
        }
    }
}

/// Configuration for the Twitter/X API client.
///
/// Holds the bearer token used for the read-only v2 endpoints together with the
/// throttling, retry, pagination and caching limits. A missing bearer token does
/// not prevent the service from starting; every API call fails with a
/// configuration error instead.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The Bearer Token for OAuth 2.0 App-only authentication
    pub bearer_token: Option<String>,
    /// API root, without a trailing slash
    pub api_base_url: String,
    /// Minimum spacing between the start of consecutive upstream calls
    pub min_interval: Duration,
    /// Automatic retries on HTTP 429
    pub max_retries: u32,
    /// Longest 429 wait that is retried automatically
    pub retry_wait_ceiling: Duration,
    /// Cap on following-list pages fetched per check
    pub max_pages: u32,
    /// Entries requested per following-list page
    pub page_size: u32,
    pub account_cache_ttl: Duration,
    pub follow_cache_ttl: Duration,
    /// Deadline for a single upstream attempt
    pub request_timeout: Duration,
    /// Default account checked by the `/twitter/follows` endpoint
    pub target: FollowTarget,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_base_url: "https://api.twitter.com/2".to_string(),
            min_interval: Duration::from_millis(900),
            max_retries: 2,
            retry_wait_ceiling: Duration::from_millis(5_000),
            max_pages: 5,
            page_size: MAX_PAGE_SIZE,
            account_cache_ttl: Duration::from_millis(600_000),
            follow_cache_ttl: Duration::from_millis(300_000),
            request_timeout: Duration::from_millis(30_000),
            target: FollowTarget::new("1234567890", Some("AnalyzerFinance")),
        }
    }
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TWITTER_BEARER_TOKEN`: Bearer Token; when unset, follow verification is disabled
    /// - `TWITTER_API_BASE_URL`: API root (default `https://api.twitter.com/2`)
    /// - `TWITTER_MIN_INTERVAL_MS`: spacing between calls (default 900)
    /// - `TWITTER_MAX_RETRIES`: automatic 429 retries (default 2)
    /// - `TWITTER_RETRY_WAIT_CEILING_MS`: longest automatically retried wait (default 5000)
    /// - `TWITTER_MAX_PAGES`: following pages per check (default 5)
    /// - `TWITTER_PAGE_SIZE`: entries per page, 1 to 1000 (default 1000)
    /// - `TWITTER_ACCOUNT_CACHE_TTL_MS`: account lookup cache TTL (default 600000)
    /// - `TWITTER_FOLLOW_CACHE_TTL_MS`: follow verdict cache TTL (default 300000)
    /// - `TWITTER_REQUEST_TIMEOUT_MS`: per-attempt deadline (default 30000)
    /// - `ANALYZER_TWITTER_ID` / `ANALYZER_TWITTER_USERNAME`: default follow target
    ///
    /// Values that fail to parse are logged and replaced by their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use followcheck::TwitterConfig;
    ///
    /// std::env::set_var("TWITTER_BEARER_TOKEN", "your_bearer_token");
    /// let config = TwitterConfig::from_env();
    /// assert!(config.is_configured());
    /// ```
    pub fn from_env() -> Self {
        info!("Loading Twitter configuration from environment variables");
        let defaults = Self::default();

        let bearer_token = match env::var("TWITTER_BEARER_TOKEN") {
            Ok(token) if !token.trim().is_empty() => {
                info!(
                    "Found TWITTER_BEARER_TOKEN environment variable with length: {}",
                    token.len()
                );
                debug!("Bearer token (masked): {}", mask_secret(&token));
                if token.len() < 10 {
                    warn!(
                        "Bearer token seems unusually short ({} characters)",
                        token.len()
                    );
                }
                Some(token)
            }
            Ok(_) | Err(_) => {
                warn!("Twitter Bearer Token not configured. Twitter follow verification will be disabled.");
                None
            }
        };

        let api_base_url = env::var("TWITTER_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let page_size: u32 = env_or("TWITTER_PAGE_SIZE", defaults.page_size);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            warn!(
                "TWITTER_PAGE_SIZE {} outside 1-{}, clamping",
                page_size, MAX_PAGE_SIZE
            );
            page_size.clamp(1, MAX_PAGE_SIZE)
        };

        let target = FollowTarget {
            id: env::var("ANALYZER_TWITTER_ID").unwrap_or(defaults.target.id),
            handle: env::var("ANALYZER_TWITTER_USERNAME")
                .ok()
                .or(defaults.target.handle),
        };

        let config = TwitterConfig {
            bearer_token,
            api_base_url,
            min_interval: env_millis_or("TWITTER_MIN_INTERVAL_MS", defaults.min_interval),
            max_retries: env_or("TWITTER_MAX_RETRIES", defaults.max_retries),
            retry_wait_ceiling: env_millis_or(
                "TWITTER_RETRY_WAIT_CEILING_MS",
                defaults.retry_wait_ceiling,
            ),
            max_pages: env_or("TWITTER_MAX_PAGES", defaults.max_pages),
            page_size,
            account_cache_ttl: env_millis_or(
                "TWITTER_ACCOUNT_CACHE_TTL_MS",
                defaults.account_cache_ttl,
            ),
            follow_cache_ttl: env_millis_or("TWITTER_FOLLOW_CACHE_TTL_MS", defaults.follow_cache_ttl),
            request_timeout: env_millis_or("TWITTER_REQUEST_TIMEOUT_MS", defaults.request_timeout),
            target,
        };

        info!(
            "Twitter configuration loaded: base_url={}, min_interval={}ms, max_retries={}, max_pages={}, page_size={}, target={}",
            config.api_base_url,
            config.min_interval.as_millis(),
            config.max_retries,
            config.max_pages,
            config.page_size,
            config.target.id
        );

        config
    }

    /// Returns true when a bearer token is available.
    pub fn is_configured(&self) -> bool {
        self.bearer_token.is_some()
    }
}

/// Masks a secret for logging, keeping only a short prefix and suffix.
pub(crate) fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let prefix: String = chars.iter().take(8).collect();
    if chars.len() > 16 {
        let suffix: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid {} value '{}', using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_millis_or(name: &str, default: Duration) -> Duration {
    Duration::from_millis(env_or(name, default.as_millis() as u64))
}

/// Gets the server port from environment variables or returns the default.
///
/// This function reads the `PORT` environment variable and parses it as a u16.
/// If the environment variable is not set or cannot be parsed, it defaults to 3000.
///
/// # Example
///
/// ```rust
/// use followcheck::get_server_port;
///
/// // With no PORT set
/// let port = get_server_port(); // Returns 3000
/// ```
pub fn get_server_port() -> u16 {
    env_or("PORT", 3000)
}
