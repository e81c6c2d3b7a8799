//! Configuration error types for the Shopify MCP server.
//!
//! This module contains the error type returned when credentials, store
//! handles, or client settings fail validation. Errors raised while talking
//! to the Admin API live in [`crate::clients::ShopifyError`].
//!
//! # Example
//!
//! ```rust
//! use shopify_mcp::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building configuration.
///
/// Each variant carries a message intended for the operator starting the
/// server, since configuration failures abort startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a Shopify Admin API access token.")]
    EmptyAccessToken,

    /// Store handle is invalid.
    #[error("Invalid store handle '{handle}'. Expected 'shop-name', 'shop-name.myshopify.com', or a custom domain such as 'shop.example.com'.")]
    InvalidStoreHandle {
        /// The invalid handle that was provided.
        handle: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-10') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'http://127.0.0.1:8080').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Request timeout must be positive.
    #[error("Request timeout must be greater than zero.")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_access_token_error_message() {
        let message = ConfigError::EmptyAccessToken.to_string();
        assert!(message.contains("Access token cannot be empty"));
    }

    #[test]
    fn test_invalid_store_handle_error_message() {
        let error = ConfigError::InvalidStoreHandle {
            handle: "bad handle!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad handle!"));
        assert!(message.contains("custom domain"));
    }

    #[test]
    fn test_invalid_api_version_error_message() {
        let error = ConfigError::InvalidApiVersion {
            version: "2025-13".to_string(),
        };
        assert!(error.to_string().contains("'2025-13'"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::ZeroTimeout;
        let _: &dyn std::error::Error = &error;
    }
}
