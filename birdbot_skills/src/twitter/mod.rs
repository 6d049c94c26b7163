//! Thin skill wrappers over the Twitter v2 API.
//!
//! One skill per file, all the same shape: validate arguments, consult the
//! rate limiter (session auth only), delegate to the authenticated client,
//! narrate the outcome.

pub mod auth;
pub mod client;
pub mod post;
pub mod reply;

use std::sync::Arc;

use crate::error::SkillError;
use crate::rate_limiter::RateLimiter;
use crate::skill::Skill;

pub use auth::{AuthProvider, TwitterAuth};
pub use client::{CreateTweetResponse, TweetData, TwitterApi, TwitterClient};
pub use post::PostTweetSkill;
pub use reply::ReplyTweetSkill;

/// Maximum tweet length imposed by the platform.
pub const MAX_TWEET_CHARS: usize = 280;

/// All Twitter skills wired against one account and one rate-limit store.
pub fn twitter_skills(
    agent_id: String,
    auth: Arc<dyn AuthProvider>,
    limiter: Arc<dyn RateLimiter>,
) -> Vec<Arc<dyn Skill>> {
    vec![
        Arc::new(ReplyTweetSkill::new(
            agent_id.clone(),
            auth.clone(),
            limiter.clone(),
        )),
        Arc::new(PostTweetSkill::new(agent_id, auth, limiter)),
    ]
}

/// Append the acting account to an error message so the agent can tell
/// whose credentials were involved.
pub(crate) fn error_with_handle(auth: &dyn AuthProvider, message: String) -> String {
    match auth.handle() {
        Some(handle) => format!("{message} (acting as @{handle})"),
        None => message,
    }
}

pub(crate) fn validate_tweet_text(text: &str) -> Result<(), SkillError> {
    if text.is_empty() {
        return Err(SkillError::InvalidArgs(
            "text must not be empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_TWEET_CHARS {
        return Err(SkillError::InvalidArgs(format!(
            "text is {chars} characters; the platform limit is {MAX_TWEET_CHARS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_measured_in_characters_not_bytes() {
        // 280 multibyte characters are still within the limit.
        let text = "ü".repeat(MAX_TWEET_CHARS);
        assert!(validate_tweet_text(&text).is_ok());
        assert!(validate_tweet_text(&"ü".repeat(MAX_TWEET_CHARS + 1)).is_err());
        assert!(validate_tweet_text("").is_err());
    }
}
