//! Admin API version selection.
//!
//! Every request targets a fixed, versioned admin path. [`ApiVersion`] names
//! the quarterly releases this server has been exercised against, plus an
//! escape hatch for newer ones.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::ApiVersion;
///
/// let version: ApiVersion = "2025-07".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2025_07);
/// assert_eq!(version.admin_path(), "/admin/api/2025-07");
/// assert_eq!(ApiVersion::latest().to_string(), "2025-10");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V2025_01,
    V2025_04,
    V2025_07,
    /// The default.
    V2025_10,
    Unstable,
    /// A release newer than the ones listed above, in `YYYY-MM` form.
    Custom(String),
}

const KNOWN: [(ApiVersion, &str); 5] = [
    (ApiVersion::V2025_01, "2025-01"),
    (ApiVersion::V2025_04, "2025-04"),
    (ApiVersion::V2025_07, "2025-07"),
    (ApiVersion::V2025_10, "2025-10"),
    (ApiVersion::Unstable, "unstable"),
];

impl ApiVersion {
    /// Returns the version used when none is configured.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2025_10
    }

    /// Returns `true` for named quarterly releases.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Unstable | Self::Custom(_))
    }

    /// Returns the versioned admin path prefix, e.g. `/admin/api/2025-10`.
    #[must_use]
    pub fn admin_path(&self) -> String {
        format!("/admin/api/{self}")
    }

    fn is_release_format(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };
        year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && matches!(month, "01" | "04" | "07" | "10")
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Custom(version) = self {
            return f.write_str(version);
        }
        let label = KNOWN
            .iter()
            .find(|(known, _)| known == self)
            .map_or("unstable", |(_, label)| label);
        f.write_str(label)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Some((version, _)) = KNOWN.iter().find(|(_, label)| *label == s) {
            return Ok(version.clone());
        }
        if Self::is_release_format(&s) {
            Ok(Self::Custom(s))
        } else {
            Err(ConfigError::InvalidApiVersion { version: s })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parses_known_versions() {
        assert_eq!(
            "2025-01".parse::<ApiVersion>().unwrap(),
            ApiVersion::V2025_01
        );
        assert_eq!(
            " 2025-10 ".parse::<ApiVersion>().unwrap(),
            ApiVersion::V2025_10
        );
        assert_eq!(
            "UNSTABLE".parse::<ApiVersion>().unwrap(),
            ApiVersion::Unstable
        );
    }

    #[test]
    fn test_api_version_display_round_trips() {
        for (version, label) in &KNOWN {
            assert_eq!(&version.to_string(), label);
        }
        assert_eq!(ApiVersion::Custom("2026-01".to_string()).to_string(), "2026-01");
    }

    #[test]
    fn test_api_version_parses_future_versions() {
        let version: ApiVersion = "2026-04".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2026-04".to_string()));
        assert!(!version.is_stable());
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("invalid".parse::<ApiVersion>().is_err());
        assert!("2025".parse::<ApiVersion>().is_err());
        assert!("2025-1".parse::<ApiVersion>().is_err());
        assert!("2025-02".parse::<ApiVersion>().is_err());
        assert!("25-01".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_admin_path() {
        assert_eq!(ApiVersion::latest().admin_path(), "/admin/api/2025-10");
        assert_eq!(ApiVersion::Unstable.admin_path(), "/admin/api/unstable");
    }
}
