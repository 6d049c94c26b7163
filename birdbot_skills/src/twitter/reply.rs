use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::auth::AuthProvider;
use super::{error_with_handle, validate_tweet_text, MAX_TWEET_CHARS};
use crate::error::SkillError;
use crate::rate_limiter::{RateLimitDecision, RateLimiter};
use crate::skill::Skill;

// Client-side budget for session-auth accounts.
const MAX_REQUESTS: u32 = 48;
const WINDOW_MINUTES: i64 = 1440;

#[derive(Debug, Deserialize)]
struct ReplyTweetArgs {
    tweet_id: String,
    text: String,
}

impl ReplyTweetArgs {
    fn parse(args: Value) -> Result<Self, SkillError> {
        let args: ReplyTweetArgs = serde_json::from_value(args)
            .map_err(|e| SkillError::InvalidArgs(format!("Invalid arguments for reply_tweet: {e}")))?;
        if args.tweet_id.trim().is_empty() {
            return Err(SkillError::InvalidArgs(
                "tweet_id must not be empty".to_string(),
            ));
        }
        validate_tweet_text(&args.text)?;
        Ok(args)
    }
}

/// Replies to an existing tweet through the authenticated client.
pub struct ReplyTweetSkill {
    agent_id: String,
    auth: Arc<dyn AuthProvider>,
    limiter: Arc<dyn RateLimiter>,
}

impl ReplyTweetSkill {
    pub fn new(
        agent_id: String,
        auth: Arc<dyn AuthProvider>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            agent_id,
            auth,
            limiter,
        }
    }

    fn platform_error(&self, message: String) -> SkillError {
        SkillError::Platform(error_with_handle(self.auth.as_ref(), message))
    }
}

#[async_trait]
impl Skill for ReplyTweetSkill {
    fn name(&self) -> &str {
        "reply_tweet"
    }

    fn description(&self) -> &str {
        "Reply to an existing tweet on Twitter"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tweet_id": {
                    "type": "string",
                    "description": "The ID of the tweet to reply to"
                },
                "text": {
                    "type": "string",
                    "description": "The text content of the reply tweet",
                    "maxLength": MAX_TWEET_CHARS
                }
            },
            "required": ["tweet_id", "text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, SkillError> {
        let args = ReplyTweetArgs::parse(args)?;

        // Session auth draws from the account's client-side budget; key
        // auth is limited on the platform side instead.
        if !self.auth.use_key_auth() {
            let decision = self
                .limiter
                .check(&self.agent_id, self.name(), MAX_REQUESTS, WINDOW_MINUTES)
                .map_err(|e| self.platform_error(format!("Error posting reply tweet: {e:#}")))?;
            if let RateLimitDecision::Limited { reason } = decision {
                return Err(SkillError::RateLimited(error_with_handle(
                    self.auth.as_ref(),
                    format!("Error replying to tweet: {reason}"),
                )));
            }
        }

        let client = self.auth.client().ok_or_else(|| {
            SkillError::ClientUnavailable(error_with_handle(
                self.auth.as_ref(),
                "Failed to get Twitter client. Please check your authentication.".to_string(),
            ))
        })?;

        let response = client
            .create_tweet(&args.text, Some(&args.tweet_id), self.auth.use_key_auth())
            .await
            .map_err(|e| self.platform_error(format!("Error posting reply tweet: {e:#}")))?;

        match response.data {
            Some(data) => {
                tracing::info!(
                    skill = self.name(),
                    reply_id = %data.id,
                    in_reply_to = %args.tweet_id,
                    "posted reply"
                );
                Ok(format!(
                    "Reply posted successfully! Reply Tweet ID: {}",
                    data.id
                ))
            }
            None => Err(self.platform_error("Failed to post reply tweet.".to_string())),
        }
    }
}
