//! Error type for Twitter API calls.

use std::fmt;

/// Everything that can go wrong between a caller and the Twitter API.
///
/// A user or relationship that does not exist is not an error: lookups return
/// `Ok(None)` and follow checks return `Ok(false)`.
#[derive(Debug)]
pub enum TwitterError {
    /// Required credentials are missing; the call never reached the queue.
    Configuration(String),
    /// HTTP 429 that could not be absorbed by the automatic retry window.
    RateLimited { retry_after_ms: u64 },
    /// Any other non-2xx response.
    Upstream { status: u16, body: Option<String> },
    /// Network-level failure (connect, TLS, body read).
    Transport(reqwest::Error),
    /// The per-attempt request deadline elapsed.
    Timeout,
    /// The response body did not have the expected shape.
    Decode(serde_json::Error),
    /// The throttled queue stopped before the task produced a result.
    Queue(&'static str),
}

impl TwitterError {
    /// Whether this error must reach the caller of a follow check instead of
    /// being turned into a "not verified" result.
    pub fn is_fatal_for_verification(&self) -> bool {
        matches!(
            self,
            TwitterError::Configuration(_) | TwitterError::RateLimited { .. }
        )
    }

    /// Suggested wait in whole seconds, rounded up, for rate limit errors.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            TwitterError::RateLimited { retry_after_ms } => Some(retry_after_ms.div_ceil(1000)),
            _ => None,
        }
    }
}

impl fmt::Display for TwitterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwitterError::Configuration(msg) => write!(f, "Twitter API not configured: {}", msg),
            TwitterError::RateLimited { retry_after_ms } => {
                write!(f, "Twitter API rate limit (retry after {} ms)", retry_after_ms)
            }
            TwitterError::Upstream { status, .. } => write!(f, "Twitter API error: {}", status),
            TwitterError::Transport(e) => write!(f, "Twitter API request failed: {}", e),
            TwitterError::Timeout => write!(f, "Twitter API request timed out"),
            TwitterError::Decode(e) => write!(f, "Unexpected Twitter API response: {}", e),
            TwitterError::Queue(msg) => write!(f, "Twitter request queue error: {}", msg),
        }
    }
}

impl std::error::Error for TwitterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TwitterError::Transport(e) => Some(e),
            TwitterError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TwitterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TwitterError::Timeout
        } else {
            TwitterError::Transport(e)
        }
    }
}

impl From<serde_json::Error> for TwitterError {
    fn from(e: serde_json::Error) -> Self {
        TwitterError::Decode(e)
    }
}
