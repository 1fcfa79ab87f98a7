//! Client configuration.
//!
//! Values come from explicit builder calls or from the environment
//! (`API_KEY`, `API_SECRET`, `PODCASTINDEX_BASE_URL`, `ENABLE_ANALYTICS`,
//! `TELEMETRY_URL`), with a `.env` file loaded first if one exists.

use std::env;

use crate::error::ClientError;

/// Versioned API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.podcastindex.org/api/1.0";

/// `<clientName>/<clientVersion>`.
pub const DEFAULT_USER_AGENT: &str = concat!("podcastindex-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub user_agent: String,
    pub enable_analytics: bool,
    /// Collector that receives telemetry events. Analytics stay off without
    /// one, whatever `enable_analytics` says.
    pub telemetry_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            enable_analytics: false,
            telemetry_url: None,
        }
    }

    /// Load from the process environment. Missing credentials are an error;
    /// everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        // A missing .env file is fine.
        dotenvy::dotenv().ok();

        let api_key = env::var("API_KEY")
            .map_err(|_| ClientError::Configuration("API_KEY is not set".to_string()))?;
        let api_secret = env::var("API_SECRET")
            .map_err(|_| ClientError::Configuration("API_SECRET is not set".to_string()))?;

        let mut config = Self::new(api_key, api_secret);
        if let Ok(base_url) = env::var("PODCASTINDEX_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Ok(flag) = env::var("ENABLE_ANALYTICS") {
            config.enable_analytics = parse_flag(&flag);
        }
        config.telemetry_url = env::var("TELEMETRY_URL").ok().filter(|url| !url.is_empty());
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Turn analytics on, reporting to `collector_url`.
    pub fn with_analytics(mut self, collector_url: impl Into<String>) -> Self {
        self.enable_analytics = true;
        self.telemetry_url = Some(collector_url.into());
        self
    }

    pub fn without_analytics(mut self) -> Self {
        self.enable_analytics = false;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("enable_analytics", &self.enable_analytics)
            .field("telemetry_url", &self.telemetry_url)
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
