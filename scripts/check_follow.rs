//! Follow Check Utility
//!
//! Checks from the command line whether a Twitter user follows the configured
//! target account (or an explicit target id), using the same throttled client
//! as the service.
//!
//! Usage: `check_follow <username> [target_id]`

use followcheck::{FollowTarget, TwitterClient, TwitterConfig, TwitterError};

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let username = match args.next() {
        Some(username) => username,
        None => {
            eprintln!("Usage: check_follow <username> [target_id]");
            std::process::exit(2);
        }
    };

    let config = TwitterConfig::from_env();
    if !config.is_configured() {
        eprintln!("❌ Error: TWITTER_BEARER_TOKEN environment variable is not set.");
        std::process::exit(1);
    }

    let target = match args.next() {
        Some(id) => FollowTarget::new(id, None),
        None => config.target.clone(),
    };
    let client = TwitterClient::new(config);

    println!("🔍 Checking if @{} follows {}...", username, target.id);

    match client.resolve_account(&username).await {
        Ok(Some(account)) => println!(
            "✅ Found user: {} (@{}, ID: {}, followers: {})",
            account.display_name,
            account.handle,
            account.id,
            account
                .follower_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        ),
        Ok(None) => {
            println!("❌ Twitter user @{} not found", username);
            return;
        }
        Err(e) => exit_with(&e),
    }

    match client.is_following(&username, &target).await {
        Ok(true) => println!("✅ @{} follows {}", username, target.id),
        Ok(false) => println!("❌ @{} does not follow {}", username, target.id),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &TwitterError) -> ! {
    match e.retry_after_secs() {
        Some(secs) => eprintln!("⏳ Rate limited by Twitter, try again in {} seconds", secs),
        None => eprintln!("❌ Error: {}", e),
    }
    std::process::exit(1);
}
