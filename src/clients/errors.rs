//! Typed error taxonomy for Admin API calls.
//!
//! Every failure surfaced by the transport layer or by a domain operation is
//! one [`ShopifyError`] variant. The set is closed, so callers can match on
//! [`ShopifyError::kind`] exhaustively instead of probing message strings.
//!
//! # Example
//!
//! ```rust
//! use shopify_mcp::clients::{ErrorContext, ErrorKind, ShopifyError};
//!
//! let error = ShopifyError::Input {
//!     message: "percentage discount value must be between 0 and 1".to_string(),
//!     context: ErrorContext::default(),
//! };
//!
//! match error.kind() {
//!     ErrorKind::Input => println!("fix the arguments: {error}"),
//!     other => println!("{other:?}: {error}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request data attached to an error for diagnostics.
///
/// All fields are optional; each producer fills in what it knows. The access
/// token is never recorded here.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ErrorContext {
    /// The full request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The GraphQL document, for structured-query requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// GraphQL variables or REST query parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    /// Operation-level parameters that produced the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Value of the `X-Request-Id` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorContext {
    /// Creates a context holding only operation parameters.
    #[must_use]
    pub fn with_params(params: serde_json::Value) -> Self {
        Self {
            params: Some(params),
            ..Self::default()
        }
    }
}

/// One entry of a mutation's `userErrors` list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserErrorDetail {
    /// Path to the offending input field, if the API reported one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable code, if the API reported one.
    #[serde(default)]
    pub code: Option<String>,
}

/// Discriminant of [`ShopifyError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential rejected or missing access scope.
    Authorization,
    /// Caller input was rejected, locally or by the API.
    Input,
    /// The store must settle a payment before the call is allowed.
    Payment,
    /// Any other non-success response.
    Request,
    /// The requested product variant does not exist.
    VariantNotFound,
    /// The product variant exists but cannot be sold.
    VariantNotAvailableForSale,
    /// Network, decoding, or other unclassified failure.
    GeneralClient,
    /// A mutation succeeded at the transport level but reported user errors.
    User,
}

/// How loudly an error is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Caller-caused; logged as a diagnostic.
    Low,
    /// Unexpected; logged as an error.
    High,
}

/// The error type of every API-facing operation.
///
/// Errors are constructed by the classifier in
/// [`classify`](crate::clients::classify) or by local validation in domain
/// operations, and are never mutated afterwards.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP 401/403 or an access-denied GraphQL error.
    #[error("{message}")]
    Authorization {
        /// Description of the failure.
        message: String,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// Invalid input, detected locally or reported by a 4xx response.
    #[error("{message}")]
    Input {
        /// Description of the failure.
        message: String,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// HTTP 402 or a payment-required GraphQL error.
    #[error("{message}")]
    Payment {
        /// Description of the failure.
        message: String,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// Any other failed response, including GraphQL `errors` inside a 200.
    #[error("Request failed with status {status}: {message}")]
    Request {
        /// HTTP status code of the response.
        status: u16,
        /// Description of the failure.
        message: String,
        /// The raw response body.
        body: serde_json::Value,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// A variant looked up before completing a draft order does not exist.
    #[error("Product variant {variant_id} not found")]
    VariantNotFound {
        /// The normalized variant id.
        variant_id: String,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// A variant looked up before completing a draft order is not for sale.
    #[error("Product variant {variant_id} is not available for sale")]
    VariantNotAvailableForSale {
        /// The normalized variant id.
        variant_id: String,
        /// Request data that produced the error.
        context: ErrorContext,
    },

    /// Network failure, undecodable body, or unexpected response shape.
    #[error("{message}")]
    GeneralClient {
        /// Description of the failure.
        message: String,
        /// Request data that produced the error.
        context: ErrorContext,
        /// The original failure, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A mutation returned a non-empty `userErrors` list.
    #[error("{}", format_user_errors(.errors))]
    User {
        /// The user errors exactly as reported.
        errors: Vec<UserErrorDetail>,
        /// Request data that produced the error.
        context: ErrorContext,
    },
}

fn format_user_errors(errors: &[UserErrorDetail]) -> String {
    errors
        .iter()
        .map(|error| match &error.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), error.message),
            _ => error.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl ShopifyError {
    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Input { .. } => ErrorKind::Input,
            Self::Payment { .. } => ErrorKind::Payment,
            Self::Request { .. } => ErrorKind::Request,
            Self::VariantNotFound { .. } => ErrorKind::VariantNotFound,
            Self::VariantNotAvailableForSale { .. } => ErrorKind::VariantNotAvailableForSale,
            Self::GeneralClient { .. } => ErrorKind::GeneralClient,
            Self::User { .. } => ErrorKind::User,
        }
    }

    /// Returns the reporting severity for this error.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self.kind() {
            ErrorKind::Request | ErrorKind::GeneralClient => Severity::High,
            ErrorKind::Authorization
            | ErrorKind::Input
            | ErrorKind::Payment
            | ErrorKind::VariantNotFound
            | ErrorKind::VariantNotAvailableForSale
            | ErrorKind::User => Severity::Low,
        }
    }

    /// Returns the diagnostic context.
    #[must_use]
    pub const fn context(&self) -> &ErrorContext {
        match self {
            Self::Authorization { context, .. }
            | Self::Input { context, .. }
            | Self::Payment { context, .. }
            | Self::Request { context, .. }
            | Self::VariantNotFound { context, .. }
            | Self::VariantNotAvailableForSale { context, .. }
            | Self::GeneralClient { context, .. }
            | Self::User { context, .. } => context,
        }
    }

    /// Returns the user errors for [`ShopifyError::User`], empty otherwise.
    #[must_use]
    pub fn user_errors(&self) -> &[UserErrorDetail] {
        match self {
            Self::User { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Builds an [`ShopifyError::Input`] from a local validation failure.
    #[must_use]
    pub fn input(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Input {
            message: message.into(),
            context,
        }
    }

    /// Builds a [`ShopifyError::GeneralClient`] wrapping `source`.
    #[must_use]
    pub fn general<E>(message: impl Into<String>, context: ErrorContext, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::GeneralClient {
            message: message.into(),
            context,
            source: Some(Box::new(source)),
        }
    }

    /// Builds a [`ShopifyError::GeneralClient`] for an unexpected response shape.
    #[must_use]
    pub fn unexpected_shape(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::GeneralClient {
            message: message.into(),
            context,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_error(field: Option<&[&str]>, message: &str) -> UserErrorDetail {
        UserErrorDetail {
            field: field.map(|f| f.iter().map(ToString::to_string).collect()),
            message: message.to_string(),
            code: None,
        }
    }

    #[test]
    fn test_user_error_message_joins_fields_and_messages() {
        let error = ShopifyError::User {
            errors: vec![
                user_error(Some(&["basicCodeDiscount", "code"]), "Code must be unique"),
                user_error(None, "Something else"),
            ],
            context: ErrorContext::default(),
        };
        assert_eq!(
            error.to_string(),
            "basicCodeDiscount.code: Code must be unique; Something else"
        );
        assert_eq!(error.user_errors().len(), 2);
    }

    #[test]
    fn test_kind_and_severity_mapping() {
        let low = ShopifyError::input("bad", ErrorContext::default());
        assert_eq!(low.kind(), ErrorKind::Input);
        assert_eq!(low.severity(), Severity::Low);

        let high = ShopifyError::Request {
            status: 500,
            message: "{}".to_string(),
            body: serde_json::json!({}),
            context: ErrorContext::default(),
        };
        assert_eq!(high.kind(), ErrorKind::Request);
        assert_eq!(high.severity(), Severity::High);
        assert!(high.to_string().contains("500"));
    }

    #[test]
    fn test_variant_errors_name_the_variant() {
        let error = ShopifyError::VariantNotAvailableForSale {
            variant_id: "gid://shopify/ProductVariant/1".to_string(),
            context: ErrorContext::default(),
        };
        assert!(error.to_string().contains("gid://shopify/ProductVariant/1"));
        assert_eq!(error.severity(), Severity::Low);
    }

    #[test]
    fn test_general_error_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ShopifyError::general("decode failed", ErrorContext::default(), json_error);
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::GeneralClient);
    }

    #[test]
    fn test_context_serialization_skips_empty_fields() {
        let context = ErrorContext::with_params(serde_json::json!({"id": "1"}));
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json, serde_json::json!({"params": {"id": "1"}}));
    }
}
