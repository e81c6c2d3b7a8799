//! Transport and error types for Admin API communication.
//!
//! This module provides the layer below the domain operations: typed
//! errors, the classifier that produces them, and the HTTP transport with
//! its two entry points.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async transport for REST-style and GraphQL calls
//! - [`HttpRequest`]: A REST-style request to be sent to the API
//! - [`HttpResponse`]: A parsed response, with the `Link` continuation token
//! - [`ShopifyError`]: The closed error taxonomy, with [`ErrorKind`] tags
//! - [`ErrorReporter`]: The side channel every classified error is sent to
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_mcp::clients::{HttpClient, HttpMethod, HttpRequest, TracingReporter};
//! use shopify_mcp::{ClientConfig, StoreCredential};
//!
//! let credential = StoreCredential::parse("shpat_...", "my-store")?;
//! let client = HttpClient::new(&credential, &ClientConfig::default(), Arc::new(TracingReporter))?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "shop.json").build()?;
//! let response = client.request("my-store.myshopify.com", request).await?;
//! println!("{}", response.body["shop"]["name"]);
//! ```
//!
//! # Failure Handling
//!
//! Requests are attempted once. A non-2xx status, or a GraphQL response with
//! a top-level `errors` array, is classified into a [`ShopifyError`] and
//! reported before being returned.

pub mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use classify::{ErrorReporter, TracingReporter};
pub use errors::{ErrorContext, ErrorKind, Severity, ShopifyError, UserErrorDetail};
pub use http_client::{HttpClient, SERVER_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, InvalidHttpRequestError};
pub use http_response::{next_page_cursor, HttpResponse};
