//! Integration tests for the transport and error classification.
//!
//! These tests run operations against a mock server and verify how HTTP
//! statuses and GraphQL error bodies surface as typed errors.

mod common;

use common::{client, mock_graphql, recording_client, rest_path, GRAPHQL_PATH};
use serde_json::json;
use shopify_mcp::ErrorKind;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_requests_carry_token_and_store_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("x-shopify-access-token", "shpat_test"))
        .and(header("host", "test-shop.myshopify.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"shop": {"features": {
                "eligibleForSubscriptions": true,
                "sellsSubscriptions": true
            }}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let eligible = client(&server).check_subscription_eligibility().await.unwrap();
    assert!(eligible);
}

#[tokio::test]
async fn test_subscription_eligibility_requires_both_flags() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CheckSubscriptionEligibility",
        json!({"shop": {"features": {
            "eligibleForSubscriptions": true,
            "sellsSubscriptions": false
        }}}),
    )
    .await;

    assert!(!client(&server).check_subscription_eligibility().await.unwrap());
}

// ============================================================================
// Domain Resolution
// ============================================================================

#[tokio::test]
async fn test_custom_domain_is_resolved_once_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("shop.json")))
        .and(header("host", "shop.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shop": {
                "id": 1,
                "name": "Example",
                "myshopify_domain": "example-store.myshopify.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rest_path("customers.json")))
        .and(header("host", "example-store.myshopify.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"customers": []})))
        .expect(1)
        .mount(&server)
        .await;

    let page = common::client_for(&server, "shop.example.com")
        .load_customers(10, None)
        .await
        .unwrap();
    assert!(page.customers.is_empty());
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_canonical_handle_skips_lookup() {
    let server = MockServer::start().await;

    let domain = client(&server).canonical_domain().await.unwrap();
    assert_eq!(domain.as_ref(), "test-shop.myshopify.com");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_aborts_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("shop.json")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token"
        })))
        .mount(&server)
        .await;

    let error = common::client_for(&server, "shop.example.com")
        .load_customers(10, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Authorization);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_graphql_access_denied_is_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Access denied for products field.",
                "extensions": {"code": "ACCESS_DENIED"}
            }]
        })))
        .mount(&server)
        .await;

    let (client, reporter) = recording_client(&server);
    let error = client.load_products(None, 10, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Authorization);
    assert_eq!(reporter.kinds(), vec![ErrorKind::Authorization]);
}

#[tokio::test]
async fn test_graphql_errors_without_code_are_request_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Field 'foo' doesn't exist"}, {"message": "Parse error"}]
        })))
        .mount(&server)
        .await;

    let error = client(&server).load_products(None, 10, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Request);
    assert!(error.to_string().contains("Field 'foo' doesn't exist, Parse error"));
}

#[tokio::test]
async fn test_payment_required_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("customers.json")))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "errors": "Unavailable Shop"
        })))
        .mount(&server)
        .await;

    let error = client(&server).load_customers(10, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Payment);
}

#[tokio::test]
async fn test_unprocessable_with_field_errors_is_input() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(rest_path("price_rules/12.json")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": {"base": ["Price rule is in use"]}
        })))
        .mount(&server)
        .await;

    let error = client(&server).delete_price_rule("12").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Input);
}

#[tokio::test]
async fn test_server_error_is_request_error_with_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("customers.json")))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("x-request-id", "req-42")
                .set_body_json(json!({"errors": "Internal error"})),
        )
        .mount(&server)
        .await;

    let (client, reporter) = recording_client(&server);
    let error = client.load_customers(10, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Request);
    assert!(error.to_string().contains("req-42"));
    assert_eq!(reporter.kinds(), vec![ErrorKind::Request]);
}

#[tokio::test]
async fn test_success_with_invalid_json_is_general_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("customers.json")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = client(&server).load_customers(10, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GeneralClient);
}

#[tokio::test]
async fn test_graphql_null_data_is_general_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let error = client(&server).load_shop_details().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GeneralClient);
}

// ============================================================================
// Shop
// ============================================================================

#[tokio::test]
async fn test_load_shop_details() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadShopDetails",
        json!({"shop": {
            "name": "Test Shop",
            "email": "owner@example.com",
            "currencyCode": "EUR",
            "shipsToCountries": ["DE", "FR"],
            "myshopifyDomain": "test-shop.myshopify.com",
            "primaryDomain": {"host": "shop.example.com", "url": "https://shop.example.com"}
        }}),
    )
    .await;

    let details = client(&server).load_shop_details().await.unwrap();
    assert_eq!(details.name, "Test Shop");
    assert_eq!(details.currency_code, "EUR");
    assert_eq!(details.ships_to_countries, vec!["DE", "FR"]);
}

#[tokio::test]
async fn test_load_shop_uses_rest_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("shop.json")))
        .and(query_param_is_absent())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shop": {"id": 7, "name": "Test Shop", "myshopify_domain": "test-shop.myshopify.com"}
        })))
        .mount(&server)
        .await;

    let shop = client(&server).load_shop().await.unwrap();
    assert_eq!(shop.id, 7);
    assert_eq!(shop.myshopify_domain, "test-shop.myshopify.com");
}

fn query_param_is_absent() -> impl wiremock::Match {
    |request: &wiremock::Request| request.url.query().is_none()
}

#[tokio::test]
async fn test_customers_follow_link_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("customers.json")))
        .and(query_param("page_info", "CURSOR1"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    r#"<https://test-shop.myshopify.com/admin/api/2025-10/customers.json?page_info=PREV>; rel="previous", <https://test-shop.myshopify.com/admin/api/2025-10/customers.json?limit=2&page_info=CURSOR2>; rel="next""#,
                )
                .set_body_json(json!({
                    "customers": [
                        {"id": 1, "email": "a@example.com", "tags": "vip"},
                        {"id": 2, "email": null, "tags": ""}
                    ]
                })),
        )
        .mount(&server)
        .await;

    let page = client(&server).load_customers(2, Some("CURSOR1")).await.unwrap();
    assert_eq!(page.customers.len(), 2);
    assert_eq!(page.customers[0].tags, "vip");
    assert_eq!(page.next.as_deref(), Some("CURSOR2"));
}
