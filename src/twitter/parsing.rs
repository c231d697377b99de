//! Username parsing and validation utilities.
//!
//! Pure helpers with no I/O: normalizing user-entered usernames and checking
//! that a username has a valid Twitter format.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Longest username Twitter allows.
pub const MAX_USERNAME_LEN: usize = 15;

/// Why a username failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUsername {
    Length,
    Characters,
}

impl fmt::Display for InvalidUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidUsername::Length => write!(f, "Username must be 1-15 characters"),
            InvalidUsername::Characters => write!(
                f,
                "Username can only contain letters, numbers, and underscores"
            ),
        }
    }
}

impl std::error::Error for InvalidUsername {}

/// Trims whitespace and strips leading `@` characters. Case is preserved.
pub(crate) fn normalize_username(username: &str) -> &str {
    username.trim().trim_start_matches('@')
}

/// Cache key for an already normalized username.
pub(crate) fn account_cache_key(normalized: &str) -> String {
    normalized.to_lowercase()
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"))
}

/// Checks that a username has a valid Twitter format, without calling the API.
///
/// The first `@` is ignored; what remains must be 1 to 15 letters, digits or
/// underscores.
///
/// # Example
///
/// ```rust
/// use followcheck::{validate_username, InvalidUsername};
///
/// assert_eq!(validate_username("@jack"), Ok(()));
/// assert_eq!(validate_username("no spaces"), Err(InvalidUsername::Characters));
/// assert_eq!(validate_username("@"), Err(InvalidUsername::Length));
/// ```
pub fn validate_username(username: &str) -> Result<(), InvalidUsername> {
    let clean = username.replacen('@', "", 1);

    let len = clean.chars().count();
    if !(1..=MAX_USERNAME_LEN).contains(&len) {
        return Err(InvalidUsername::Length);
    }

    if !username_regex().is_match(&clean) {
        return Err(InvalidUsername::Characters);
    }

    Ok(())
}
