//! Process configuration for the server binary.

use std::time::Duration;

use clap::Parser;

use super::{ApiVersion, ClientConfig, StoreCredential};
use crate::error::ConfigError;

/// Command-line and environment configuration.
///
/// Both the access token and the store domain are required; the process
/// refuses to start without them.
#[derive(Clone, Debug, Parser)]
#[command(name = "shopify-mcp-server", version, about)]
pub struct ServerConfig {
    /// Shopify Admin API access token.
    #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Store domain, e.g. `my-store.myshopify.com` or a custom domain.
    #[arg(long, env = "MYSHOPIFY_DOMAIN")]
    pub domain: String,

    /// Admin API version.
    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = "2025-10")]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "SHOPIFY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Validates the raw values into a credential and client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty token, an invalid domain, an
    /// unknown API version, or a zero timeout.
    pub fn resolve(&self) -> Result<(StoreCredential, ClientConfig), ConfigError> {
        let credential = StoreCredential::parse(&self.access_token, &self.domain)?;
        let api_version: ApiVersion = self.api_version.parse()?;
        let config = ClientConfig::builder()
            .api_version(api_version)
            .request_timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok((credential, config))
    }
}
