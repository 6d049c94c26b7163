use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::auth::AuthProvider;
use super::{error_with_handle, validate_tweet_text, MAX_TWEET_CHARS};
use crate::error::SkillError;
use crate::rate_limiter::{RateLimitDecision, RateLimiter};
use crate::skill::Skill;

const MAX_REQUESTS: u32 = 48;
const WINDOW_MINUTES: i64 = 1440;

#[derive(Debug, Deserialize)]
struct PostTweetArgs {
    text: String,
}

/// Posts a standalone tweet through the authenticated client. Same shape as
/// [`super::reply::ReplyTweetSkill`], minus the target.
pub struct PostTweetSkill {
    agent_id: String,
    auth: Arc<dyn AuthProvider>,
    limiter: Arc<dyn RateLimiter>,
}

impl PostTweetSkill {
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
impl Skill for PostTweetSkill {
    fn name(&self) -> &str {
        "post_tweet"
    }

    fn description(&self) -> &str {
        "Post a new tweet to Twitter"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text content of the tweet",
                    "maxLength": MAX_TWEET_CHARS
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, SkillError> {
        let args: PostTweetArgs = serde_json::from_value(args)
            .map_err(|e| SkillError::InvalidArgs(format!("Invalid arguments for post_tweet: {e}")))?;
        validate_tweet_text(&args.text)?;

        if !self.auth.use_key_auth() {
            let decision = self
                .limiter
                .check(&self.agent_id, self.name(), MAX_REQUESTS, WINDOW_MINUTES)
                .map_err(|e| self.platform_error(format!("Error posting tweet: {e:#}")))?;
            if let RateLimitDecision::Limited { reason } = decision {
                return Err(SkillError::RateLimited(error_with_handle(
                    self.auth.as_ref(),
                    format!("Error posting tweet: {reason}"),
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
            .create_tweet(&args.text, None, self.auth.use_key_auth())
            .await
            .map_err(|e| self.platform_error(format!("Error posting tweet: {e:#}")))?;

        match response.data {
            Some(data) => {
                tracing::info!(skill = self.name(), tweet_id = %data.id, "posted tweet");
                Ok(format!("Tweet posted successfully! Tweet ID: {}", data.id))
            }
            None => Err(self.platform_error("Failed to post tweet.".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limiter::SqliteRateLimiter;
    use crate::twitter::client::{CreateTweetResponse, TweetData, TwitterApi};

    struct StubApi;

    #[async_trait]
    impl TwitterApi for StubApi {
        async fn create_tweet(
            &self,
            _text: &str,
            in_reply_to_tweet_id: Option<&str>,
            _user_auth: bool,
        ) -> anyhow::Result<CreateTweetResponse> {
            // A plain tweet must not carry a reply target.
            assert!(in_reply_to_tweet_id.is_none());
            Ok(CreateTweetResponse {
                data: Some(TweetData {
                    id: "555".to_string(),
                }),
            })
        }
    }

    struct StubAuth;

    impl AuthProvider for StubAuth {
        fn use_key_auth(&self) -> bool {
            false
        }

        fn client(&self) -> Option<Arc<dyn TwitterApi>> {
            Some(Arc::new(StubApi))
        }

        fn handle(&self) -> Option<&str> {
            None
        }
    }

    fn skill() -> PostTweetSkill {
        let limiter = Arc::new(SqliteRateLimiter::open_in_memory().expect("open store"));
        PostTweetSkill::new("test-agent".to_string(), Arc::new(StubAuth), limiter)
    }

    #[tokio::test]
    async fn successful_post_narrates_the_new_id() {
        let output = skill()
            .execute(json!({ "text": "hello" }))
            .await
            .expect("execute");
        assert_eq!(output, "Tweet posted successfully! Tweet ID: 555");
    }

    #[tokio::test]
    async fn overlong_text_fails_validation() {
        let result = skill().execute(json!({ "text": "x".repeat(281) })).await;
        assert!(matches!(result, Err(SkillError::InvalidArgs(_))));
    }

    #[tokio::test]
    async fn missing_text_fails_validation() {
        let result = skill().execute(json!({})).await;
        assert!(matches!(result, Err(SkillError::InvalidArgs(_))));
    }
}
