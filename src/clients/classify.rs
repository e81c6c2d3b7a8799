//! Error classification and reporting.
//!
//! The functions here are pure: they turn a failed response (or a mutation
//! payload) into exactly one [`ShopifyError`]. Logging happens separately,
//! through the [`ErrorReporter`] held by each client.

use std::fmt::Debug;

use serde_json::Value;

use crate::clients::errors::{ErrorContext, Severity, ShopifyError, UserErrorDetail};

const AUTHORIZATION_CODES: [&str; 3] = ["ACCESS_DENIED", "UNAUTHORIZED", "FORBIDDEN"];
const AUTHORIZATION_MESSAGES: [&str; 3] = ["access scope", "access denied", "invalid api key"];
const PAYMENT_CODE: &str = "PAYMENT_REQUIRED";
const PAYMENT_MESSAGE: &str = "payment required";

/// Classifies a non-2xx response.
///
/// `status` 401/403 maps to authorization, 402 to payment, and any other
/// 4xx whose `errors` member is an object of field messages to input. All
/// remaining statuses become [`ShopifyError::Request`].
#[must_use]
pub fn classify_http(
    status: u16,
    body: &Value,
    request_id: Option<&str>,
    context: ErrorContext,
) -> ShopifyError {
    let message = serialize_error(body, request_id);
    match status {
        401 | 403 => ShopifyError::Authorization { message, context },
        402 => ShopifyError::Payment { message, context },
        400..=499 if body.get("errors").is_some_and(Value::is_object) => {
            ShopifyError::Input { message, context }
        }
        _ => ShopifyError::Request {
            status,
            message,
            body: body.clone(),
            context,
        },
    }
}

/// Classifies a GraphQL response carrying a top-level `errors` array.
///
/// The HTTP status is usually 200 here; it is kept on the resulting
/// [`ShopifyError::Request`] for diagnostics.
#[must_use]
pub fn classify_graphql(status: u16, body: &Value, context: ErrorContext) -> ShopifyError {
    let errors = body
        .get("errors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let message = errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), ToString::to_string)
        })
        .collect::<Vec<_>>()
        .join(", ");

    if errors.iter().any(is_authorization_error) {
        return ShopifyError::Authorization { message, context };
    }
    if errors.iter().any(is_payment_error) {
        return ShopifyError::Payment { message, context };
    }
    ShopifyError::Request {
        status,
        message,
        body: body.clone(),
        context,
    }
}

/// Fails with [`ShopifyError::User`] when `payload[key]` is a non-empty list.
///
/// Mutation payloads name the list `userErrors` except for a few media
/// mutations, hence the explicit key.
///
/// # Errors
///
/// Returns [`ShopifyError::User`] carrying the reported entries unchanged, or
/// [`ShopifyError::GeneralClient`] if an entry lacks a message.
pub fn check_user_errors(payload: &Value, key: &str, context: &ErrorContext) -> Result<(), ShopifyError> {
    let Some(entries) = payload.get(key).and_then(Value::as_array) else {
        return Ok(());
    };
    if entries.is_empty() {
        return Ok(());
    }

    let errors = serde_json::from_value::<Vec<UserErrorDetail>>(Value::Array(entries.clone()))
        .map_err(|e| ShopifyError::general("Malformed user error list", context.clone(), e))?;

    Err(ShopifyError::User {
        errors,
        context: context.clone(),
    })
}

/// Serializes the error members of a REST body into the message format
/// shared by every REST failure.
#[must_use]
pub fn serialize_error(body: &Value, request_id: Option<&str>) -> String {
    let mut error_body = serde_json::Map::new();

    if let Some(errors) = body.get("errors") {
        error_body.insert("errors".to_string(), errors.clone());
    }
    if let Some(error) = body.get("error") {
        error_body.insert("error".to_string(), error.clone());
        if let Some(description) = body.get("error_description") {
            error_body.insert("error_description".to_string(), description.clone());
        }
    }
    if let Some(raw) = body.get("raw_body") {
        error_body.insert("raw_body".to_string(), raw.clone());
    }
    if let Some(request_id) = request_id {
        error_body.insert(
            "error_reference".to_string(),
            Value::String(format!(
                "If you report this error, please include this id: {request_id}."
            )),
        );
    }

    Value::Object(error_body).to_string()
}

fn error_code(error: &Value) -> Option<&str> {
    error
        .get("extensions")
        .and_then(|extensions| extensions.get("code"))
        .and_then(Value::as_str)
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

fn is_authorization_error(error: &Value) -> bool {
    if error_code(error).is_some_and(|code| AUTHORIZATION_CODES.contains(&code)) {
        return true;
    }
    let message = error_message(error);
    AUTHORIZATION_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
}

fn is_payment_error(error: &Value) -> bool {
    error_code(error) == Some(PAYMENT_CODE) || error_message(error).contains(PAYMENT_MESSAGE)
}

/// Side channel notified of every classified error.
///
/// Implementations must not panic; their outcome never changes the error
/// returned to the caller.
pub trait ErrorReporter: Debug + Send + Sync {
    /// Records `error`.
    fn report(&self, error: &ShopifyError);
}

/// Reports errors as `tracing` events, `warn` for low severity and `error`
/// for high severity.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &ShopifyError) {
        let context = error.context();
        let url = context.url.as_deref().unwrap_or_default();
        let request_id = context.request_id.as_deref().unwrap_or_default();
        match error.severity() {
            Severity::Low => tracing::warn!(
                kind = ?error.kind(),
                url,
                request_id,
                "Shopify API call rejected: {error}"
            ),
            Severity::High => tracing::error!(
                kind = ?error.kind(),
                url,
                request_id,
                "Shopify API call failed: {error}"
            ),
        }
    }
}
