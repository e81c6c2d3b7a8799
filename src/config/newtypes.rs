//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify Admin API access token.
///
/// The token is opaque to this crate; the only check is that it is non-empty.
/// Its value is masked in debug output so it never reaches the logs.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::AccessToken;
///
/// let token = AccessToken::new("shpat_123").unwrap();
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// assert_eq!(token.as_ref(), "shpat_123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty or whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token.to_string()))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A caller-supplied store handle.
///
/// Unlike a canonical domain, a handle may be a custom storefront domain
/// (`shop.example.com`). Bare shop names are expanded to the
/// `shop-name.myshopify.com` form, schemes and trailing slashes are stripped.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::StoreHandle;
///
/// let handle = StoreHandle::new("my-store").unwrap();
/// assert_eq!(handle.as_ref(), "my-store.myshopify.com");
/// assert!(handle.is_canonical());
///
/// let custom = StoreHandle::new("https://Shop.Example.com/").unwrap();
/// assert_eq!(custom.as_ref(), "shop.example.com");
/// assert!(!custom.is_canonical());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreHandle(String);

impl StoreHandle {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated store handle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreHandle`] if the handle is not a valid host name.
    pub fn new(handle: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = handle.into();
        let mut host = raw.trim().to_lowercase();
        for scheme in ["https://", "http://"] {
            if let Some(rest) = host.strip_prefix(scheme) {
                host = rest.to_string();
            }
        }
        let host = host.trim_end_matches('/').to_string();

        if host.is_empty() {
            return Err(ConfigError::InvalidStoreHandle { handle: raw });
        }

        let host = if host.contains('.') {
            host
        } else {
            format!("{host}{}", Self::SUFFIX)
        };

        if !host.split('.').all(Self::is_valid_label) {
            return Err(ConfigError::InvalidStoreHandle { handle: raw });
        }

        Ok(Self(host))
    }

    /// Returns `true` when the handle already is a `*.myshopify.com` domain.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0.ends_with(Self::SUFFIX)
    }

    /// Returns the handle as a canonical domain when no lookup is needed.
    #[must_use]
    pub fn canonical(&self) -> Option<CanonicalDomain> {
        self.is_canonical().then(|| CanonicalDomain(self.0.clone()))
    }

    fn is_valid_label(label: &str) -> bool {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for StoreHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StoreHandle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StoreHandle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// The store's canonical Admin API host name.
///
/// Obtained either directly from a `*.myshopify.com` [`StoreHandle`] or from
/// the `myshopify_domain` field of the shop lookup. Every request after
/// resolution targets this host, never the raw handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalDomain(String);

impl CanonicalDomain {
    /// Wraps a domain reported by the shop lookup endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreHandle`] if the reported value is not a host name.
    pub fn from_lookup(domain: &str) -> Result<Self, ConfigError> {
        StoreHandle::new(domain).map(|handle| Self(handle.0))
    }
}

impl AsRef<str> for CanonicalDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated API host override.
///
/// When configured, requests are sent to this origin instead of the store
/// domain, and the store domain travels in the `Host` header. This is how
/// the client is pointed at a proxy or a local mock server.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::HostUrl;
///
/// let url = HostUrl::new("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), "127.0.0.1");
/// assert_eq!(url.origin(), "http://127.0.0.1:8080");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    origin: String,
    scheme_end: usize,
    host_end: usize,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// Any path, query, or fragment is discarded; only the origin is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim();
        let invalid = || ConfigError::InvalidHostUrl { url: url.clone() };

        let scheme_end = trimmed.find("://").ok_or_else(invalid)?;
        let scheme = &trimmed[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let authority_start = scheme_end + 3;
        let remainder = &trimmed[authority_start..];
        let authority_len = remainder.find(['/', '?', '#']).unwrap_or(remainder.len());
        let authority = &remainder[..authority_len];
        let host_len = authority.find(':').unwrap_or(authority.len());
        if host_len == 0 {
            return Err(invalid());
        }

        Ok(Self {
            origin: trimmed[..authority_start + authority_len].to_string(),
            scheme_end,
            host_end: authority_start + host_len,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.origin[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.origin[self.scheme_end + 3..self.host_end]
    }

    /// Returns `scheme://host[:port]` without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.origin
    }
}
