//! HTTP route handlers for the followcheck service.
//!
//! This module contains the HTTP route handler functions that expose account
//! lookup, follow verification and username validation to the rest of the
//! system, and maps client errors onto HTTP responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::twitter::{validate_username, TwitterClient, TwitterError};

/// Shared handler state: the single client instance of the process.
pub type AppState = Arc<TwitterClient>;

type HandlerResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Builds the application router with all routes.
///
/// - `GET /health`: Health check
/// - `GET /twitter/users/:username`: Resolve a username to an account
/// - `GET /twitter/follows/:username`: Check whether the user follows the configured target
/// - `GET /twitter/validate/:username`: Validate username format without calling the API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/twitter/users/:username", get(handle_resolve_account))
        .route("/twitter/follows/:username", get(handle_follow_check))
        .route("/twitter/validate/:username", get(handle_validate_username))
        .with_state(state)
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "followcheck"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "followcheck"}))
}

/// Handles GET requests to `/twitter/users/:username`.
///
/// Returns the resolved account, or 404 when the user does not exist.
pub async fn handle_resolve_account(
    State(client): State<AppState>,
    Path(username): Path<String>,
) -> HandlerResult {
    match client.resolve_account(&username).await {
        Ok(Some(account)) => Ok(Json(json!({"status": "success", "account": account}))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Twitter user not found"})),
        )),
        Err(e) => Err(error_response(&e)),
    }
}

/// Handles GET requests to `/twitter/follows/:username`.
///
/// Verifies that `username` follows the target configured through
/// `ANALYZER_TWITTER_ID` / `ANALYZER_TWITTER_USERNAME`.
///
/// # Success Response
///
/// ```json
/// {
///   "status": "success",
///   "username": "jack",
///   "target_id": "1234567890",
///   "following": true
/// }
/// ```
///
/// # Rate Limit Response (429)
///
/// ```json
/// {
///   "status": "error",
///   "message": "Twitter rate limit reached, try again in 30 seconds",
///   "retry_after_seconds": 30
/// }
/// ```
pub async fn handle_follow_check(
    State(client): State<AppState>,
    Path(username): Path<String>,
) -> HandlerResult {
    if let Err(e) = validate_username(&username) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": e.to_string()})),
        ));
    }

    let target = &client.config().target;
    match client.is_following(&username, target).await {
        Ok(following) => {
            info!("Follow check for @{}: {}", username, following);
            Ok(Json(json!({
                "status": "success",
                "username": username.trim_start_matches('@'),
                "target_id": target.id,
                "following": following,
            })))
        }
        Err(e) => Err(error_response(&e)),
    }
}

/// Handles GET requests to `/twitter/validate/:username`.
pub async fn handle_validate_username(Path(username): Path<String>) -> Json<Value> {
    match validate_username(&username) {
        Ok(()) => Json(json!({"valid": true})),
        Err(e) => Json(json!({"valid": false, "error": e.to_string()})),
    }
}

/// Maps a client error onto an HTTP status and JSON body.
fn error_response(e: &TwitterError) -> (StatusCode, Json<Value>) {
    match e {
        TwitterError::RateLimited { .. } => {
            let secs = e.retry_after_secs().unwrap_or_default();
            warn!("Twitter rate limit surfaced to caller, retry in {}s", secs);
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "status": "error",
                    "message": format!("Twitter rate limit reached, try again in {} seconds", secs),
                    "retry_after_seconds": secs,
                })),
            )
        }
        TwitterError::Configuration(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "error", "message": "Twitter verification is not configured"})),
        ),
        TwitterError::Upstream { .. } | TwitterError::Transport(_) | TwitterError::Timeout => {
            error!("Twitter API failure: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"status": "error", "message": "Twitter API request failed", "error": e.to_string()})),
            )
        }
        TwitterError::Decode(_) | TwitterError::Queue(_) => {
            error!("Internal error talking to Twitter API: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "Internal error", "error": e.to_string()})),
            )
        }
    }
}
