use std::env;

use thiserror::Error;
use url::Url;

/// Environment variable overriding the service base URL.
pub const BASE_URL_VAR: &str = "INTERVIEW_API_URL";

/// Default base URL, matching a locally running service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base URL {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
}

/// Connection settings for the remote interview service.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    base_url: String,
}

impl RemoteConfig {
    /// Validate and store a base URL. A trailing slash is dropped so endpoint
    /// paths can be appended uniformly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();
        Url::parse(&trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
            raw: raw.clone(),
            source,
        })?;
        Ok(Self { base_url: trimmed })
    }

    /// Read the base URL from `INTERVIEW_API_URL`, defaulting to a local
    /// service.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the configured URL does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(raw)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a named endpoint, e.g. `questions` or `answer/3`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Full URL for a server-supplied download path such as
    /// `/download-resume?filename=x`. These are relative to the base URL, not
    /// to the host root.
    #[must_use]
    pub fn download_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            self.endpoint(path)
        }
    }
}
