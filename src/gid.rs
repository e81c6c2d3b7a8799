//! Global identifier normalization.
//!
//! The Admin GraphQL API addresses every resource by a global id of the form
//! `gid://shopify/<ResourceType>/<id>`. Callers may pass either that form or
//! a bare numeric id; [`GlobalId::normalize`] turns both into the former.
//!
//! # Example
//!
//! ```rust
//! use shopify_mcp::gid::{GlobalId, ResourceType};
//!
//! let id = GlobalId::normalize("123", ResourceType::Product);
//! assert_eq!(id.as_str(), "gid://shopify/Product/123");
//!
//! let again = GlobalId::normalize(id.as_str(), ResourceType::Product);
//! assert_eq!(again, id);
//! assert_eq!(again.numeric_id(), Some("123"));
//! ```

use std::fmt;

use serde::Serialize;

const PREFIX: &str = "gid://";
const PLATFORM: &str = "shopify";

/// Resource type segment of a global id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Product,
    ProductVariant,
    Customer,
    Order,
    DraftOrder,
    Collection,
    PriceRule,
    DiscountCodeNode,
    WebhookSubscription,
    MediaImage,
    Shop,
    Location,
}

impl ResourceType {
    const ALL: [Self; 12] = [
        Self::Product,
        Self::ProductVariant,
        Self::Customer,
        Self::Order,
        Self::DraftOrder,
        Self::Collection,
        Self::PriceRule,
        Self::DiscountCodeNode,
        Self::WebhookSubscription,
        Self::MediaImage,
        Self::Shop,
        Self::Location,
    ];

    /// Returns the segment as it appears in a global id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::ProductVariant => "ProductVariant",
            Self::Customer => "Customer",
            Self::Order => "Order",
            Self::DraftOrder => "DraftOrder",
            Self::Collection => "Collection",
            Self::PriceRule => "PriceRule",
            Self::DiscountCodeNode => "DiscountCodeNode",
            Self::WebhookSubscription => "WebhookSubscription",
            Self::MediaImage => "MediaImage",
            Self::Shop => "Shop",
            Self::Location => "Location",
        }
    }

    /// Looks up a segment, matching case-insensitively.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(segment.trim()))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized global id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// Normalizes `id` for `resource_type`.
    ///
    /// An id already in `gid://` form is returned unchanged, whatever type it
    /// embeds; anything else is wrapped.
    #[must_use]
    pub fn normalize(id: &str, resource_type: ResourceType) -> Self {
        let id = id.trim();
        if id.starts_with(PREFIX) {
            Self(id.to_string())
        } else {
            Self(format!("{PREFIX}{PLATFORM}/{resource_type}/{id}"))
        }
    }

    /// Accepts an id that already is in `gid://` form with a type segment.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        type_segment(id).map(|_| Self(id.trim().to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the type segment, e.g. `Product` for `gid://shopify/Product/1`.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        type_segment(&self.0)
    }

    /// Returns the trailing id segment with any `?query` suffix removed.
    #[must_use]
    pub fn numeric_id(&self) -> Option<&str> {
        let last = self.0.rsplit('/').next()?;
        let last = last.split('?').next().unwrap_or(last);
        (!last.is_empty()).then_some(last)
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Returns the type segment embedded in a raw `gid://` string, if any.
#[must_use]
pub fn type_segment(id: &str) -> Option<&str> {
    let rest = id.trim().strip_prefix(PREFIX)?;
    let mut parts = rest.split('/');
    let _platform = parts.next()?;
    parts.next().filter(|segment| !segment.is_empty())
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<GlobalId> for String {
    fn from(id: GlobalId) -> Self {
        id.0
    }
}
