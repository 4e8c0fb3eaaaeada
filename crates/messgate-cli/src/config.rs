//! Service connection flags.

use std::time::Duration;

use clap::Args;
use messgate_client::{ClientConfig, ClientError, HttpGateApi, DEFAULT_API_URL};

/// Flags shared by every command that talks to the service.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Base URL of the entry service
    #[arg(long, global = true, env = "MESSGATE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    /// Bearer token for authenticated calls
    #[arg(long, global = true, env = "MESSGATE_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "MESSGATE_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

impl ServiceArgs {
    /// Validated client settings.
    pub fn client_config(&self) -> Result<ClientConfig, ClientError> {
        ClientConfig::new(&self.api_url)?
            .with_auth_token(self.auth_token.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// HTTP client for the configured service.
    pub fn connect(&self) -> Result<HttpGateApi, ClientError> {
        let config = self.client_config()?;
        tracing::debug!(api_url = %config.api_url, "connecting to entry service");
        HttpGateApi::new(config)
    }
}
