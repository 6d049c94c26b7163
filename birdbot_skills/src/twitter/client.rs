use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Seam over the tweet-creation endpoint so skills can be exercised without
/// the network.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Create a tweet, optionally as a reply to an existing one.
    ///
    /// `user_auth` tells the platform which credential set signed the
    /// request: the account's static keys or the interactive session.
    async fn create_tweet(
        &self,
        text: &str,
        in_reply_to_tweet_id: Option<&str>,
        user_auth: bool,
    ) -> Result<CreateTweetResponse>;
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplyTarget<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyTarget<'a> {
    in_reply_to_tweet_id: &'a str,
}

/// Response from `POST /2/tweets`. The identifier is optional on purpose: a
/// body without `data.id` is a handled failure, not a crash.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    #[serde(default)]
    pub data: Option<TweetData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TweetData {
    pub id: String,
}

#[derive(Clone)]
pub struct TwitterClient {
    base_url: String,
    bearer_token: String,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(base_url: String, bearer_token: String) -> Self {
        Self {
            base_url,
            bearer_token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn create_tweet(
        &self,
        text: &str,
        in_reply_to_tweet_id: Option<&str>,
        _user_auth: bool,
    ) -> Result<CreateTweetResponse> {
        let url = format!("{}/2/tweets", self.base_url);
        let request = CreateTweetRequest {
            text,
            reply: in_reply_to_tweet_id.map(|id| ReplyTarget {
                in_reply_to_tweet_id: id,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.bearer_token))
            .json(&request)
            .send()
            .await
            .context("Failed to send tweet request")?;

        // Include the response body in errors for debugging
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            anyhow::bail!("Twitter API returned error {}: {}", status, body);
        }

        let created = response
            .json()
            .await
            .context("Failed to parse tweet response")?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_reply_target_only_when_replying() {
        let reply = CreateTweetRequest {
            text: "hello",
            reply: Some(ReplyTarget {
                in_reply_to_tweet_id: "123",
            }),
        };
        assert_eq!(
            serde_json::to_value(&reply).expect("serialize"),
            json!({ "text": "hello", "reply": { "in_reply_to_tweet_id": "123" } })
        );

        let plain = CreateTweetRequest {
            text: "hello",
            reply: None,
        };
        assert_eq!(
            serde_json::to_value(&plain).expect("serialize"),
            json!({ "text": "hello" })
        );
    }

    #[test]
    fn response_without_data_decodes_to_none() {
        let ok: CreateTweetResponse =
            serde_json::from_value(json!({ "data": { "id": "123" } })).expect("decode");
        assert_eq!(ok.data.map(|d| d.id).as_deref(), Some("123"));

        let empty: CreateTweetResponse = serde_json::from_value(json!({})).expect("decode");
        assert!(empty.data.is_none());

        let errored: CreateTweetResponse =
            serde_json::from_value(json!({ "errors": [{ "message": "nope" }] }))
                .expect("decode");
        assert!(errored.data.is_none());
    }
}
