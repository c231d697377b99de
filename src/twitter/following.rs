//! Twitter/X API integration for verifying follow relationships.

use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

use super::client::TwitterClient;
use super::error::TwitterError;
use super::users::ApiUser;
use crate::config::{FollowTarget, MAX_PAGE_SIZE};

#[derive(Debug, Deserialize)]
struct FollowingPage {
    #[serde(default)]
    data: Option<Vec<ApiUser>>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_token: Option<String>,
}

/// Follow cache key for a source/target pair.
pub(crate) fn follow_cache_key(source_id: &str, target_id: &str) -> String {
    format!("{}->{}", source_id, target_id)
}

/// Whether a follow list entry is the target account.
///
/// The API sometimes omits one of the two fields, so both are checked
/// separately.
pub(crate) fn matches_target(entry: &ApiUser, target: &FollowTarget) -> bool {
    if entry.id == target.id {
        return true;
    }
    match (entry.username.as_deref(), target.handle.as_deref()) {
        (Some(entry_handle), Some(target_handle)) => {
            entry_handle.eq_ignore_ascii_case(target_handle)
        }
        _ => false,
    }
}

impl TwitterClient {
    /// Checks whether `username` follows `target`.
    ///
    /// The source account is resolved first (cached), then its following list is
    /// paged through until the target shows up, the list ends or the page cap is
    /// reached. The verdict, including `false`, is cached per source/target pair.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The target was found in the following list
    /// - `Ok(false)`: Not found, unknown user, or any failure other than the two below
    /// - `Err(TwitterError::Configuration)`: No bearer token
    /// - `Err(TwitterError::RateLimited)`: Rate limited beyond the automatic retry window
    pub async fn is_following(
        &self,
        username: &str,
        target: &FollowTarget,
    ) -> Result<bool, TwitterError> {
        match self.check_following(username, target).await {
            Ok(follows) => Ok(follows),
            Err(e) if e.is_fatal_for_verification() => Err(e),
            Err(e) => {
                warn!(
                    "Error checking whether @{} follows {}: {}",
                    username.trim(),
                    target.id,
                    e
                );
                Ok(false)
            }
        }
    }

    async fn check_following(
        &self,
        username: &str,
        target: &FollowTarget,
    ) -> Result<bool, TwitterError> {
        info!(
            "Checking if @{} follows {} (@{})",
            username.trim(),
            target.id,
            target.handle.as_deref().unwrap_or("?")
        );

        let source = match self.resolve_account(username).await? {
            Some(account) => account,
            None => {
                info!("Twitter user @{} not found", username.trim());
                return Ok(false);
            }
        };

        let cache_key = follow_cache_key(&source.id, &target.id);
        if let Some(follows) = self.follows.get(&cache_key) {
            debug!("Follow cache hit for {}: {}", cache_key, follows);
            return Ok(follows);
        }

        let found = self.scan_following(&source.id, target).await?;

        self.follows
            .insert(cache_key, found, self.config.follow_cache_ttl);
        debug!("Follow cache holds {} entries", self.follows.len());
        info!(
            "User @{} {} {}",
            source.handle,
            if found { "follows" } else { "does not follow" },
            target.id
        );
        Ok(found)
    }

    /// Pages through the following list of `source_id` looking for `target`.
    async fn scan_following(
        &self,
        source_id: &str,
        target: &FollowTarget,
    ) -> Result<bool, TwitterError> {
        let base_url = format!("{}/users/{}/following", self.config.api_base_url, source_id);
        let page_size = self.config.page_size.clamp(1, MAX_PAGE_SIZE);

        let mut pagination_token: Option<String> = None;
        let mut page: u32 = 0;

        while page < self.config.max_pages {
            let mut url = Url::parse(&base_url).map_err(|e| {
                TwitterError::Configuration(format!("invalid API base URL '{}': {}", base_url, e))
            })?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("user.fields", "username");
                query.append_pair("max_results", &page_size.to_string());
                if let Some(token) = &pagination_token {
                    query.append_pair("pagination_token", token);
                }
            }

            debug!(
                "Checking following page {} for user {}",
                page + 1,
                source_id
            );
            let response = self
                .call(url.as_str(), "fetch_user_following", self.config.max_retries)
                .await?;
            let following: FollowingPage = response.json()?;

            let entries = following.data.unwrap_or_default();
            if entries.iter().any(|entry| matches_target(entry, target)) {
                return Ok(true);
            }

            pagination_token = following.meta.and_then(|m| m.next_token);
            if pagination_token.is_none() {
                debug!(
                    "Following list of {} exhausted after {} pages",
                    source_id,
                    page + 1
                );
                return Ok(false);
            }
            page += 1;
        }

        warn!(
            "Reached max page limit ({}) for user {} without finding {}",
            self.config.max_pages, source_id, target.id
        );
        Ok(false)
    }
}
