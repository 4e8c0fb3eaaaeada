//! Connection settings for the entry service.

use std::time::Duration;

use crate::error::ClientError;

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the service lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Creates a config for `api_url`.
    ///
    /// The URL must be an absolute `http` or `https` URL; a trailing slash is
    /// dropped so paths can be appended directly.
    pub fn new(api_url: impl Into<String>) -> Result<Self, ClientError> {
        let api_url = api_url.into();
        let trimmed = api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::Config("api url cannot be empty".to_string()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "api url must start with http:// or https://, got {trimmed}"
            )));
        }
        Ok(Self {
            api_url: trimmed.to_string(),
            ..Self::default()
        })
    }

    /// Sets the bearer token. Blank tokens are treated as absent.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        if timeout.is_zero() {
            return Err(ClientError::Config("timeout must be positive".to_string()));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Full URL for a service path such as `/tokens/verify`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
