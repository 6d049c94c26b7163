use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Top-level configuration for the agent binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirdbotConfig {
    /// Platform credentials and endpoint.
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Identity used to key rate-limit windows. Falls back to the Twitter
    /// handle, then to "birdbot".
    #[serde(default)]
    pub agent_id: Option<String>,

    /// Where the rate-limit window store lives.
    #[serde(default = "default_rate_limit_db")]
    pub rate_limit_db: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Twitter API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Handle of the acting account, without the leading @.
    #[serde(default)]
    pub handle: Option<String>,

    /// Static API key credential. When set, key-based auth is active and
    /// the client-side rate limit is skipped (the platform enforces its own
    /// limits for that mode).
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth session access token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// When the session token expires. A token past this instant is treated
    /// as missing.
    #[serde(default)]
    pub access_token_expires_at: Option<DateTime<Utc>>,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            handle: None,
            api_key: None,
            access_token: None,
            access_token_expires_at: None,
        }
    }
}

impl Default for BirdbotConfig {
    fn default() -> Self {
        Self {
            twitter: TwitterConfig::default(),
            agent_id: None,
            rate_limit_db: default_rate_limit_db(),
        }
    }
}

impl BirdbotConfig {
    /// Load configuration from a TOML file, falling back to defaults plus
    /// environment variables when the file is missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Secrets can be supplied through the environment instead of the file.
    fn apply_env(&mut self) {
        if let Ok(value) = env::var("BIRDBOT_API_KEY") {
            self.twitter.api_key = Some(value);
        }
        if let Ok(value) = env::var("BIRDBOT_ACCESS_TOKEN") {
            self.twitter.access_token = Some(value);
        }
        if let Ok(value) = env::var("BIRDBOT_HANDLE") {
            self.twitter.handle = Some(value);
        }
    }

    pub fn agent_id(&self) -> &str {
        self.agent_id
            .as_deref()
            .or(self.twitter.handle.as_deref())
            .unwrap_or("birdbot")
    }
}

fn default_base_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_rate_limit_db() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("birdbot")
        .join("rate_limits.db")
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("birdbot")
        .join("config.toml")
}
