//! Shared helpers for the mock-server integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use shopify_mcp::{
    ClientConfig, ErrorKind, ErrorReporter, HostUrl, ShopifyClient, ShopifyError,
    StoreCredential,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GRAPHQL_PATH: &str = "/admin/api/2025-10/graphql.json";

/// Path of a versioned REST endpoint.
pub fn rest_path(endpoint: &str) -> String {
    format!("/admin/api/2025-10/{endpoint}")
}

/// Reporter that records the kind of every reported error.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub kinds: Mutex<Vec<ErrorKind>>,
}

impl RecordingReporter {
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.kinds.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &ShopifyError) {
        self.kinds.lock().unwrap().push(error.kind());
    }
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .api_host(HostUrl::new(server.uri()).unwrap())
        .build()
        .unwrap()
}

/// Client for the canonical `test-shop.myshopify.com` handle.
pub fn client(server: &MockServer) -> ShopifyClient {
    client_for(server, "test-shop")
}

/// Client for an arbitrary store handle.
pub fn client_for(server: &MockServer, store: &str) -> ShopifyClient {
    let credential = StoreCredential::parse("shpat_test", store).unwrap();
    ShopifyClient::new(&credential, &config(server)).unwrap()
}

/// Client that records reported errors.
pub fn recording_client(server: &MockServer) -> (ShopifyClient, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let credential = StoreCredential::parse("shpat_test", "test-shop").unwrap();
    let client = ShopifyClient::with_reporter(&credential, &config(server), reporter.clone())
        .unwrap();
    (client, reporter)
}

/// Mounts a GraphQL response for documents containing `operation`.
pub async fn mock_graphql(server: &MockServer, operation: &str, data: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains(operation))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Returns the parsed bodies of the GraphQL requests the server received.
pub async fn graphql_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == GRAPHQL_PATH)
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}
