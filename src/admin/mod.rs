//! Domain operations against the Shopify Admin API.
//!
//! [`ShopifyClient`] holds one store credential and exposes one async method
//! per remote capability. Every method first resolves the store's canonical
//! domain, then issues its requests against that domain only.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_mcp::admin::ShopifyClient;
//! use shopify_mcp::{ClientConfig, StoreCredential};
//!
//! let credential = StoreCredential::parse("shpat_...", "shop.example.com")?;
//! let client = ShopifyClient::new(&credential, &ClientConfig::default())?;
//!
//! let page = client.load_products(Some("shirt"), 10, None).await?;
//! for product in page.products {
//!     println!("{} ({})", product.title, product.id);
//! }
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::clients::classify::check_user_errors;
use crate::clients::{
    ErrorContext, ErrorReporter, HttpClient, HttpRequest, HttpRequestBuilder, HttpResponse,
    ShopifyError, TracingReporter,
};
use crate::config::{CanonicalDomain, ClientConfig, StoreCredential, StoreHandle};
use crate::gid::{GlobalId, ResourceType};

mod collections;
mod customers;
mod discounts;
mod draft_orders;
mod metafields;
mod orders;
mod products;
mod shop;
pub mod types;
mod webhooks;

pub use types::*;

/// Default name of a mutation payload's user error list.
pub(crate) const USER_ERRORS: &str = "userErrors";

/// Admin API client bound to a single store credential.
///
/// Clients are cheap to build and hold no state between calls; the server
/// builds a fresh one for each tool invocation.
///
/// # Thread Safety
///
/// `ShopifyClient` is `Send + Sync`.
#[derive(Debug)]
pub struct ShopifyClient {
    http: HttpClient,
    store: StoreHandle,
}

// Verify ShopifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyClient>();
};

impl ShopifyClient {
    /// Creates a client that reports errors through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::GeneralClient`] if the HTTP client cannot be built.
    pub fn new(credential: &StoreCredential, config: &ClientConfig) -> Result<Self, ShopifyError> {
        Self::with_reporter(credential, config, Arc::new(TracingReporter))
    }

    /// Creates a client with a custom error reporter.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::GeneralClient`] if the HTTP client cannot be built.
    pub fn with_reporter(
        credential: &StoreCredential,
        config: &ClientConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self, ShopifyError> {
        Ok(Self {
            http: HttpClient::new(credential, config, reporter)?,
            store: credential.store.clone(),
        })
    }

    /// Returns the store handle the client was built with.
    #[must_use]
    pub const fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Reports an error raised by the domain layer and hands it back.
    pub(crate) fn fail(&self, error: ShopifyError) -> ShopifyError {
        self.http.reporter().report(&error);
        error
    }

    /// Finishes a REST request builder, reporting a malformed request.
    pub(crate) fn build(&self, builder: HttpRequestBuilder) -> Result<HttpRequest, ShopifyError> {
        builder.build().map_err(|e| {
            self.fail(ShopifyError::general(
                "Invalid request",
                ErrorContext::default(),
                e,
            ))
        })
    }

    /// Sends a REST request to `domain`.
    pub(crate) async fn rest(
        &self,
        domain: &str,
        request: HttpRequest,
    ) -> Result<HttpResponse, ShopifyError> {
        self.http.request(domain, request).await
    }

    /// Runs a GraphQL document against the canonical domain and returns `data`.
    pub(crate) async fn graphql(
        &self,
        domain: &CanonicalDomain,
        query: &str,
        variables: Value,
    ) -> Result<Value, ShopifyError> {
        let response = self
            .http
            .graphql(domain.as_ref(), query, Some(variables.clone()))
            .await?;

        match response.body {
            Value::Object(mut body) => match body.remove("data") {
                Some(data) if !data.is_null() => Ok(data),
                _ => Err(self.fail(ShopifyError::unexpected_shape(
                    "GraphQL response has no data",
                    graphql_context(query, variables),
                ))),
            },
            _ => Err(self.fail(ShopifyError::unexpected_shape(
                "GraphQL response is not an object",
                graphql_context(query, variables),
            ))),
        }
    }

    /// Takes `data[field]` out of a mutation response, failing on user errors.
    pub(crate) fn mutation_payload(
        &self,
        data: &mut Value,
        field: &str,
        errors_key: &str,
        context: &ErrorContext,
    ) -> Result<Value, ShopifyError> {
        let payload = data.get_mut(field).map(Value::take).unwrap_or_default();
        if payload.is_null() {
            return Err(self.fail(ShopifyError::unexpected_shape(
                format!("Mutation payload '{field}' is missing"),
                context.clone(),
            )));
        }
        check_user_errors(&payload, errors_key, context).map_err(|e| self.fail(e))?;
        Ok(payload)
    }

    /// Serializes an input record into GraphQL variables.
    pub(crate) fn encode<T: Serialize>(&self, value: &T) -> Result<Value, ShopifyError> {
        serde_json::to_value(value).map_err(|e| {
            self.fail(ShopifyError::general(
                "Failed to encode request variables",
                ErrorContext::default(),
                e,
            ))
        })
    }

    /// Returns the numeric REST id of a bare or global id.
    pub(crate) fn rest_id(
        &self,
        id: &str,
        resource_type: ResourceType,
    ) -> Result<String, ShopifyError> {
        let gid = GlobalId::normalize(id, resource_type);
        match gid.numeric_id() {
            Some(numeric) if numeric.chars().all(|c| c.is_ascii_digit()) => {
                Ok(numeric.to_string())
            }
            _ => Err(self.fail(ShopifyError::input(
                format!("{resource_type} id '{id}' has no numeric part"),
                ErrorContext::with_params(serde_json::json!({ "id": id })),
            ))),
        }
    }

    /// Decodes `value` into `T`, reporting a shape mismatch as a general error.
    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        value: Value,
        what: &str,
        context: &ErrorContext,
    ) -> Result<T, ShopifyError> {
        serde_json::from_value(value).map_err(|e| {
            self.fail(ShopifyError::general(
                format!("Unexpected {what} shape"),
                context.clone(),
                e,
            ))
        })
    }
}

pub(crate) fn graphql_context(query: &str, variables: Value) -> ErrorContext {
    ErrorContext {
        query: Some(query.to_string()),
        variables: Some(variables),
        ..ErrorContext::default()
    }
}

/// Keeps the non-null entries of a `nodes(ids:)` result that matched the
/// requested type (others come back as `{}`).
pub(crate) fn present_nodes(nodes: Value) -> Vec<Value> {
    match nodes {
        Value::Array(nodes) => nodes
            .into_iter()
            .filter(|node| node.get("id").is_some_and(|id| !id.is_null()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Takes the value at a JSON pointer, leaving `null` behind.
pub(crate) fn take_at(value: &mut Value, pointer: &str) -> Value {
    value.pointer_mut(pointer).map(Value::take).unwrap_or_default()
}
