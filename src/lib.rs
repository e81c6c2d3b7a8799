//! # Shopify MCP Server
//!
//! A Model Context Protocol server that exposes Shopify Admin API operations
//! as tools, plus the typed client those tools are built on.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the access token and store handle
//! - A typed error taxonomy ([`ShopifyError`]) with a pure classifier for
//!   REST and GraphQL failures
//! - An async transport for REST and GraphQL requests with `Link` header
//!   pagination
//! - [`admin::ShopifyClient`], one async method per Admin API operation
//! - [`mcp::ShopifyMcpServer`], the `rmcp` tool server used by the binary
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_mcp::{ApiVersion, ClientConfig, StoreCredential};
//!
//! let credential = StoreCredential::parse("shpat_example", "my-store").unwrap();
//! let config = ClientConfig::builder()
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(credential.store.as_ref(), "my-store.myshopify.com");
//! assert_eq!(config.api_version(), &ApiVersion::latest());
//! ```
//!
//! ## Calling the Admin API
//!
//! ```rust,ignore
//! use shopify_mcp::admin::{BasicDiscountInput, ShopifyClient};
//!
//! let client = ShopifyClient::new(&credential, &config)?;
//!
//! // Resolves the canonical domain, checks subscription eligibility,
//! // then creates the discount.
//! let created = client.create_basic_discount_code(&input).await?;
//! println!("{} -> {}", created.code, created.id);
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use shopify_mcp::{ErrorKind, ShopifyError};
//!
//! match client.complete_draft_order("1", "2").await {
//!     Ok(done) => println!("order {:?}", done.order_id),
//!     Err(e) if e.kind() == ErrorKind::VariantNotAvailableForSale => {
//!         println!("variant is sold out");
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: every tool call builds its own client
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all client types are `Send + Sync`
//! - **No retries**: each request is attempted once, with a bounded timeout

pub mod admin;
pub mod clients;
pub mod config;
pub mod error;
pub mod gid;
pub mod mcp;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, ApiVersion, CanonicalDomain, ClientConfig, ClientConfigBuilder, HostUrl,
    ServerConfig, StoreCredential, StoreHandle,
};
pub use error::ConfigError;

pub use clients::{
    ErrorContext, ErrorKind, ErrorReporter, HttpClient, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, InvalidHttpRequestError, Severity, ShopifyError,
    TracingReporter, UserErrorDetail,
};

pub use admin::ShopifyClient;
pub use gid::{GlobalId, ResourceType};
pub use mcp::ShopifyMcpServer;
