//! HTTP transport for Admin API communication.
//!
//! This module provides the [`HttpClient`] type with the two transport entry
//! points: a REST-style [`request`](HttpClient::request) and a GraphQL
//! [`graphql`](HttpClient::graphql) call. Both attempt a request exactly once
//! and route failures through the classifier.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::classify::{classify_graphql, classify_http, ErrorReporter};
use crate::clients::errors::{ErrorContext, ShopifyError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ClientConfig, HostUrl, StoreCredential};

/// Server version from Cargo.toml.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Authenticated HTTP client for one store credential.
///
/// The target domain is passed per call: the shop lookup runs against the
/// caller's handle while every later call uses the canonical domain.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_path: String,
    api_host: Option<HostUrl>,
    default_headers: HashMap<String, String>,
    reporter: Arc<dyn ErrorReporter>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client for `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::GeneralClient`] if the underlying HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(
        credential: &StoreCredential,
        config: &ClientConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self, ShopifyError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Shopify MCP Server v{SERVER_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Shopify-Access-Token".to_string(),
            credential.access_token.as_ref().to_string(),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ShopifyError::general("Failed to create HTTP client", ErrorContext::default(), e)
            })?;

        Ok(Self {
            client,
            base_path: config.api_version().admin_path(),
            api_host: config.api_host().cloned(),
            default_headers,
            reporter,
        })
    }

    /// Returns the base URI requests for `domain` are sent to.
    #[must_use]
    pub fn base_uri(&self, domain: &str) -> String {
        self.api_host
            .as_ref()
            .map_or_else(|| format!("https://{domain}"), |host| host.origin().to_string())
    }

    /// Returns the versioned admin path, e.g. `/admin/api/2025-10`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the reporter errors are sent to.
    #[must_use]
    pub fn reporter(&self) -> &dyn ErrorReporter {
        self.reporter.as_ref()
    }

    /// Sends a REST-style request to `domain`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ShopifyError`] for a non-2xx status, or
    /// [`ShopifyError::GeneralClient`] for a network failure, a timeout, or a
    /// successful response whose body is not JSON.
    pub async fn request(
        &self,
        domain: &str,
        request: HttpRequest,
    ) -> Result<HttpResponse, ShopifyError> {
        let url = self.url(domain, &request.path);
        let context = ErrorContext {
            url: Some(url.clone()),
            variables: (!request.query.is_empty()).then(|| json!(request.query)),
            ..ErrorContext::default()
        };

        let result = self.send(domain, &url, &request, context).await;
        if let Err(error) = &result {
            self.reporter.report(error);
        }
        result
    }

    /// Sends a GraphQL document to `domain`'s `graphql.json` endpoint.
    ///
    /// A 200 response carrying a top-level `errors` array is classified as a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ShopifyError`] for a non-2xx status or GraphQL
    /// errors, or [`ShopifyError::GeneralClient`] for transport failures.
    pub async fn graphql(
        &self,
        domain: &str,
        query: &str,
        variables: Option<Value>,
    ) -> Result<HttpResponse, ShopifyError> {
        let url = self.url(domain, "graphql.json");
        let context = ErrorContext {
            url: Some(url.clone()),
            query: Some(query.to_string()),
            variables: variables.clone(),
            ..ErrorContext::default()
        };

        let body = json!({
            "query": query,
            "variables": variables,
        });
        let sent = match HttpRequest::builder(HttpMethod::Post, "graphql.json")
            .body(body)
            .build()
        {
            Ok(request) => self.send(domain, &url, &request, context.clone()).await,
            Err(e) => Err(ShopifyError::general("Invalid request", context.clone(), e)),
        };

        let result = match sent {
            Ok(response) if has_graphql_errors(&response.body) => {
                let context = ErrorContext {
                    request_id: response.request_id().map(String::from),
                    ..context
                };
                Err(classify_graphql(response.code, &response.body, context))
            }
            other => other,
        };

        if let Err(error) = &result {
            self.reporter.report(error);
        }
        result
    }

    fn url(&self, domain: &str, path: &str) -> String {
        format!("{}{}/{}", self.base_uri(domain), self.base_path, path)
    }

    async fn send(
        &self,
        domain: &str,
        url: &str,
        request: &HttpRequest,
        context: ErrorContext,
    ) -> Result<HttpResponse, ShopifyError> {
        request.verify().map_err(|e| {
            ShopifyError::general("Invalid request", context.clone(), e)
        })?;

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        // The store domain travels in the Host header when routed through a proxy
        if self.api_host.is_some() {
            req_builder = req_builder.header("Host", domain);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let res = req_builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Request to {url} timed out")
            } else {
                format!("Request to {url} failed: {e}")
            };
            ShopifyError::general(message, context.clone(), e)
        })?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.map_err(|e| {
            ShopifyError::general("Failed to read response body", context.clone(), e)
        })?;

        let request_id = res_headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .cloned();
        let context = ErrorContext {
            request_id,
            ..context
        };

        let ok = (200..=299).contains(&code);
        let body = if body_text.trim().is_empty() {
            json!({})
        } else if ok {
            serde_json::from_str(&body_text).map_err(|e| {
                ShopifyError::general(
                    format!("Response from {url} is not valid JSON"),
                    context.clone(),
                    e,
                )
            })?
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| json!({ "raw_body": body_text }))
        };

        let response = HttpResponse::new(code, res_headers, body);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to Shopify API at {}, received reason: {}",
                request.path,
                reason
            );
        }

        if response.is_ok() {
            return Ok(response);
        }

        Err(classify_http(
            code,
            &response.body,
            response.request_id(),
            context,
        ))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

fn has_graphql_errors(body: &Value) -> bool {
    body.get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| !errors.is_empty())
}
