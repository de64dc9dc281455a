//! Client configuration.
//!
//! The base URL is either given as a literal or read from the
//! `TODO_API_BASE_URL` environment variable, falling back to
//! [`DEFAULT_BASE_URL`].

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Upstream used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://todo-api-typescript.onrender.com";

/// Prefix of the environment variables read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "TODO_API_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration pinned to an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self {
            base_url: base_url.into(),
        }
        .validated()
    }

    /// Defaults overridden by `TODO_API_BASE_URL`. An empty override counts
    /// as unset.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: ClientConfig = Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["base_url"]))
            .extract()?;
        if config.base_url.trim().is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }
}
