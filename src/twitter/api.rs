//! Core Twitter API utilities.
//!
//! This module contains the low-level call wrapper: every request is sent through
//! the client's throttled queue, rate limit responses are retried when the
//! suggested wait is short, and all other failures are classified into
//! [`TwitterError`] variants.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::client::TwitterClient;
use super::error::TwitterError;

/// Wait used when a 429 response carries no usable rate limit headers.
pub const DEFAULT_RATE_LIMIT_WAIT_MS: u64 = 15_000;

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// Newlines and tabs become spaces and other control characters become `?`, so
/// upstream bodies cannot forge log lines. Text longer than `max_len` characters
/// is truncated.
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .take(max_len)
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if text.chars().count() > max_len {
        format!("{}... [truncated, {} total bytes]", sanitized, text.len())
    } else {
        sanitized
    }
}

/// Builds the Authorization header for OAuth 2.0 Bearer Token authentication.
///
/// ```rust
/// use followcheck::build_bearer_auth_header;
///
/// assert_eq!(build_bearer_auth_header("abc"), "Bearer abc");
/// ```
pub fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}

/// A fully read upstream response.
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(e),
            // error bodies are best effort
            Err(_) => String::new(),
        };
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TwitterError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Computes how long to wait after a 429 from its rate limit headers.
///
/// `retry-after` is read as seconds and `x-rate-limit-reset` as an epoch second;
/// the larger resulting wait wins. Without a usable positive value the wait is
/// [`DEFAULT_RATE_LIMIT_WAIT_MS`].
pub(crate) fn rate_limit_wait_ms(headers: &HeaderMap, now: DateTime<Utc>) -> u64 {
    let from_retry_after = header_number(headers, "retry-after").map(|secs| secs * 1000.0);
    let from_reset = header_number(headers, "x-rate-limit-reset")
        .map(|epoch_secs| epoch_secs * 1000.0 - now.timestamp_millis() as f64);

    let wait = match (from_retry_after, from_reset) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => 0.0,
    };

    if wait > 0.0 {
        wait.ceil() as u64
    } else {
        DEFAULT_RATE_LIMIT_WAIT_MS
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<f64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl TwitterClient {
    /// Makes one authenticated GET request to the Twitter API through the throttled queue.
    ///
    /// # Parameters
    ///
    /// - `url`: Full request URL
    /// - `operation_name`: Human-readable name for the operation (for logging)
    /// - `retries`: How many times a short 429 wait is absorbed before giving up
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: A 2xx response with its body read
    /// - `Err(TwitterError::Configuration)`: No bearer token; nothing was queued
    /// - `Err(TwitterError::RateLimited)`: 429 with a long wait or no retries left
    /// - `Err(TwitterError::Upstream)`: Any other non-2xx status, not retried
    /// - `Err(TwitterError::Transport | Timeout)`: The request itself failed
    pub(crate) async fn call(
        &self,
        url: &str,
        operation_name: &str,
        retries: u32,
    ) -> Result<ApiResponse, TwitterError> {
        let auth_header = build_bearer_auth_header(self.bearer_token()?);
        let ceiling_ms = self.config.retry_wait_ceiling.as_millis() as u64;
        let mut attempt: u32 = 0;

        loop {
            info!(
                "Making Twitter API request for operation: {} (attempt {})",
                operation_name,
                attempt + 1
            );

            let request = self
                .http
                .get(url)
                .header(AUTHORIZATION, auth_header.as_str())
                .header(CONTENT_TYPE, "application/json")
                .timeout(self.config.request_timeout);

            let response = self
                .queue
                .enqueue(async move {
                    match request.send().await {
                        Ok(response) => ApiResponse::read(response).await,
                        Err(e) => Err(e),
                    }
                })
                .await??;

            let status = response.status;
            if status.is_success() {
                debug!(
                    "Operation '{}' completed with status {}: {} bytes received",
                    operation_name,
                    status,
                    response.body.len()
                );
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait_ms = rate_limit_wait_ms(&response.headers, Utc::now());

                if attempt < retries && wait_ms <= ceiling_ms {
                    warn!(
                        "Rate limited on '{}', retrying in {} ms ({} of {} retries)",
                        operation_name,
                        wait_ms,
                        attempt + 1,
                        retries
                    );
                    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                    attempt += 1;
                    continue;
                }

                warn!(
                    "Rate limited on '{}', giving up (retry after {} ms)",
                    operation_name, wait_ms
                );
                return Err(TwitterError::RateLimited {
                    retry_after_ms: wait_ms,
                });
            }

            if status == StatusCode::NOT_FOUND {
                info!("Operation '{}' returned 404", operation_name);
            } else {
                error!("Operation '{}' failed - Status: {}", operation_name, status);
                debug!(
                    "Error response for '{}': {}",
                    operation_name,
                    sanitize_for_logging(&response.body, 200)
                );
            }

            let body = if response.body.is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(TwitterError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
    }
}
