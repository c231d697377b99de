//! Account lookup by username.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::client::TwitterClient;
use super::error::TwitterError;
use super::parsing::{account_cache_key, normalize_username};

/// A Twitter account as returned by the v2 user endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PublicMetrics {
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UserLookupResponse {
    #[serde(default)]
    data: Option<ApiUser>,
}

/// The canonical identity behind a username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAccount {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
}

impl ResolvedAccount {
    fn from_api(user: ApiUser, requested: &str) -> Self {
        let metrics = user.public_metrics;
        let handle = user.username.unwrap_or_else(|| requested.to_string());
        Self {
            display_name: user.name.unwrap_or_else(|| handle.clone()),
            id: user.id,
            handle,
            follower_count: metrics.as_ref().and_then(|m| m.followers_count),
            following_count: metrics.as_ref().and_then(|m| m.following_count),
        }
    }
}

impl TwitterClient {
    /// Looks up an account by username using the Twitter API v2.
    ///
    /// The username may carry leading `@` characters and surrounding whitespace.
    /// Results are cached per lowercased username for the account cache TTL;
    /// a cache hit makes no upstream call. Unknown users are not cached.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ResolvedAccount))`: The account was found
    /// - `Ok(None)`: No such user (HTTP 404 or an empty response)
    /// - `Err(TwitterError)`: Missing configuration or a failed API call
    pub async fn resolve_account(
        &self,
        username: &str,
    ) -> Result<Option<ResolvedAccount>, TwitterError> {
        self.bearer_token()?;

        let username = normalize_username(username);
        if username.is_empty() {
            return Ok(None);
        }

        let cache_key = account_cache_key(username);
        if let Some(account) = self.accounts.get(&cache_key) {
            debug!("Account cache hit for @{}", username);
            return Ok(Some(account));
        }

        info!("Looking up user by username: {}", username);
        let url = format!(
            "{}/users/by/username/{}?user.fields=public_metrics",
            self.config.api_base_url,
            urlencoding::encode(username)
        );

        let response = match self
            .call(&url, "lookup_user", self.config.max_retries)
            .await
        {
            Ok(response) => response,
            Err(TwitterError::Upstream { status: 404, .. }) => {
                warn!("User {} not found", username);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let lookup: UserLookupResponse = response.json()?;
        match lookup.data {
            Some(user) => {
                let account = ResolvedAccount::from_api(user, username);
                info!(
                    "Found user {}: {} (@{}), followers_count: {:?}",
                    account.id, account.display_name, account.handle, account.follower_count
                );
                self.accounts
                    .insert(cache_key, account.clone(), self.config.account_cache_ttl);
                debug!("Account cache holds {} entries", self.accounts.len());
                Ok(Some(account))
            }
            None => {
                warn!("User {} not found", username);
                Ok(None)
            }
        }
    }
}
