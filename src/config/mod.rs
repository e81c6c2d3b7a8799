//! Configuration types for the Shopify MCP server.
//!
//! This module provides the configuration used to build API clients and to
//! start the server process.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: Transport settings shared by every API client
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`StoreCredential`]: The access token and store handle supplied per call
//! - [`AccessToken`]: A validated access token with masked debug output
//! - [`StoreHandle`]: A validated store handle (canonical or custom domain)
//! - [`CanonicalDomain`]: The resolved `*.myshopify.com` host
//! - [`HostUrl`]: A validated API host override
//! - [`ApiVersion`]: The Admin API version to use
//! - [`ServerConfig`]: Process configuration parsed from flags and environment
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_mcp::{ApiVersion, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_version(ApiVersion::V2025_07)
//!     .request_timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_version(), &ApiVersion::V2025_07);
//! ```

mod newtypes;
mod server;
mod version;

pub use newtypes::{AccessToken, CanonicalDomain, HostUrl, StoreHandle};
pub use server::ServerConfig;
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Default deadline applied to every outbound request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials for a single store.
///
/// Supplied by the caller for each tool invocation and held only for the
/// lifetime of the client built from it.
#[derive(Clone, Debug)]
pub struct StoreCredential {
    /// The Admin API access token.
    pub access_token: AccessToken,
    /// The store handle as given by the caller.
    pub store: StoreHandle,
}

impl StoreCredential {
    /// Creates a credential from already-validated parts.
    #[must_use]
    pub const fn new(access_token: AccessToken, store: StoreHandle) -> Self {
        Self {
            access_token,
            store,
        }
    }

    /// Validates raw strings into a credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the token is empty or the handle is invalid.
    pub fn parse(access_token: &str, store: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(AccessToken::new(access_token)?, StoreHandle::new(store)?))
    }
}

/// Transport settings for API clients.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`; the server keeps one and
/// hands a reference to every per-call client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_version: ApiVersion,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the API host override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&HostUrl> {
        self.api_host.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: ApiVersion::latest(),
            api_host: None,
            user_agent_prefix: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `api_version`: Latest stable version
/// - `api_host`: `None` (requests go to the store domain)
/// - `user_agent_prefix`: `None`
/// - `request_timeout`: [`DEFAULT_REQUEST_TIMEOUT`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes all requests through the given host.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the per-request deadline.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if a zero timeout was set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(ClientConfig {
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            api_host: self.api_host,
            user_agent_prefix: self.user_agent_prefix,
            request_timeout,
        })
    }
}
