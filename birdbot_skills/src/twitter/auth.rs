use chrono::Utc;
use std::sync::Arc;

use super::client::{TwitterApi, TwitterClient};
use crate::config::TwitterConfig;

/// Supplies the authenticated platform client and describes which
/// authentication mode is active.
pub trait AuthProvider: Send + Sync {
    /// True when static API key credentials are configured. Key-based auth
    /// is exempt from the client-side rate limit; the platform enforces its
    /// own limits for that mode.
    fn use_key_auth(&self) -> bool;

    /// The authenticated client, or `None` when credentials are missing or
    /// the session token has expired.
    fn client(&self) -> Option<Arc<dyn TwitterApi>>;

    /// Handle of the acting account, used in narration.
    fn handle(&self) -> Option<&str>;
}

/// Credential-backed [`AuthProvider`] built from [`TwitterConfig`].
///
/// Key mode takes precedence when both credential kinds are present.
pub struct TwitterAuth {
    config: TwitterConfig,
    client: Option<Arc<TwitterClient>>,
}

impl TwitterAuth {
    pub fn new(config: TwitterConfig) -> Self {
        let token = config
            .api_key
            .clone()
            .or_else(|| config.access_token.clone());
        let client =
            token.map(|token| Arc::new(TwitterClient::new(config.base_url.clone(), token)));
        Self { config, client }
    }
}

impl AuthProvider for TwitterAuth {
    fn use_key_auth(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn client(&self) -> Option<Arc<dyn TwitterApi>> {
        if !self.use_key_auth() {
            if let Some(expires_at) = self.config.access_token_expires_at {
                if Utc::now() >= expires_at {
                    tracing::debug!(handle = ?self.config.handle, "session token expired");
                    return None;
                }
            }
        }
        self.client
            .clone()
            .map(|client| client as Arc<dyn TwitterApi>)
    }

    fn handle(&self) -> Option<&str> {
        self.config.handle.as_deref()
    }
}
