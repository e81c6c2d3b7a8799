//! Integration tests for product, order, webhook, and metafield operations.

mod common;

use common::{client, graphql_bodies, mock_graphql, rest_path};
use serde_json::json;
use shopify_mcp::admin::{
    LoadOrdersParams, MediaInput, MetafieldInput, ProductInput, ProductUpdate, VariantInput,
    VariantUpdate, WebhookAction,
};
use shopify_mcp::{ErrorKind, ResourceType};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_load_products_flattens_connections() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadProducts(",
        json!({
            "shop": {"currencyCode": "USD"},
            "products": {
                "edges": [{"node": {
                    "id": "gid://shopify/Product/1",
                    "title": "Blue Shirt",
                    "tags": null,
                    "images": {"edges": [{"node": {"url": "https://cdn.example.com/1.png", "altText": null}}]},
                    "variants": {"edges": [{"node": {
                        "id": "gid://shopify/ProductVariant/2",
                        "title": "Small",
                        "price": "19.99",
                        "availableForSale": true,
                        "selectedOptions": [{"name": "Size", "value": "S"}]
                    }}]}
                }}],
                "pageInfo": {"hasNextPage": true, "endCursor": "eyJsYXN0X2lkIjoxfQ"}
            }
        }),
    )
    .await;

    let page = client(&server)
        .load_products(Some("shirt"), 5, None)
        .await
        .unwrap();

    assert_eq!(page.currency_code, "USD");
    assert_eq!(page.next.as_deref(), Some("eyJsYXN0X2lkIjoxfQ"));
    let product = &page.products[0];
    assert!(product.tags.is_empty());
    assert_eq!(product.images[0].url, "https://cdn.example.com/1.png");
    assert_eq!(product.variants[0].selected_options[0].value, "S");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["query"], json!("title:*shirt*"));
    assert_eq!(bodies[0]["variables"]["first"], json!(5));
}

#[tokio::test]
async fn test_last_products_page_has_no_cursor() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadProducts(",
        json!({
            "shop": {"currencyCode": "USD"},
            "products": {
                "edges": [],
                "pageInfo": {"hasNextPage": false, "endCursor": "stale"}
            }
        }),
    )
    .await;

    let page = client(&server).load_products(None, 10, None).await.unwrap();
    assert!(page.products.is_empty());
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_unknown_collection_is_input_error() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadProductsByCollection",
        json!({"shop": {"currencyCode": "USD"}, "collection": null}),
    )
    .await;

    let error = client(&server)
        .load_products_by_collection_id("404", 10, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Input);
    assert!(error.to_string().contains("gid://shopify/Collection/404"));
}

#[tokio::test]
async fn test_empty_id_lists_make_no_request() {
    let server = MockServer::start().await;
    let client = client(&server);

    assert!(client.load_products_by_ids(&[]).await.unwrap().is_empty());
    assert!(client.load_variants_by_ids(&[]).await.unwrap().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_products_by_ids_skip_unmatched_nodes() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadProductsByIds",
        json!({"nodes": [
            {"id": "gid://shopify/Product/1", "title": "Shirt"},
            null,
            {}
        ]}),
    )
    .await;

    let products = client(&server)
        .load_products_by_ids(&["1".to_string(), "2".to_string(), "3".to_string()])
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Shirt");
}

#[tokio::test]
async fn test_delete_product_user_errors() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "DeleteProduct",
        json!({"productDelete": {
            "deletedProductId": null,
            "userErrors": [{"field": ["id"], "message": "Product does not exist"}]
        }}),
    )
    .await;

    let error = client(&server).delete_product("1").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::User);
    assert_eq!(error.to_string(), "id: Product does not exist");
}

#[tokio::test]
async fn test_create_media_reads_media_user_errors() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CreateProductMedia",
        json!({"productCreateMedia": {
            "media": [],
            "mediaUserErrors": [{"field": ["media", "0", "originalSource"], "message": "Image URL is invalid", "code": "INVALID"}]
        }}),
    )
    .await;

    let media: Vec<MediaInput> = serde_json::from_value(json!([{
        "originalSource": "not-a-url",
        "mediaContentType": "IMAGE"
    }]))
    .unwrap();
    let error = client(&server)
        .create_product_media("1", &media)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::User);
    assert_eq!(error.user_errors()[0].code.as_deref(), Some("INVALID"));
}

fn product_node(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": format!("gid://shopify/Product/{id}"),
        "title": title,
        "status": "ACTIVE",
        "tags": [],
        "images": {"edges": []},
        "variants": {"edges": [{"node": {
            "id": "gid://shopify/ProductVariant/5",
            "title": "Default Title",
            "price": "19.00",
            "selectedOptions": null
        }}]}
    })
}

#[tokio::test]
async fn test_products_by_collection_flattens_page() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadProductsByCollection",
        json!({
            "shop": {"currencyCode": "EUR"},
            "collection": {"products": {
                "edges": [{"node": product_node(1, "Shirt")}, {"node": product_node(2, "Hat")}],
                "pageInfo": {"hasNextPage": true, "endCursor": "P2"}
            }}
        }),
    )
    .await;

    let page = client(&server)
        .load_products_by_collection_id("7", 2, Some("P1"))
        .await
        .unwrap();

    assert_eq!(page.products.len(), 2);
    assert_eq!(page.products[1].title, "Hat");
    assert_eq!(page.products[0].variants[0].price.as_deref(), Some("19.00"));
    assert_eq!(page.next.as_deref(), Some("P2"));
    assert_eq!(page.currency_code, "EUR");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["id"], json!("gid://shopify/Collection/7"));
    assert_eq!(bodies[0]["variables"]["first"], json!(2));
    assert_eq!(bodies[0]["variables"]["after"], json!("P1"));
}

#[tokio::test]
async fn test_create_product_sends_given_fields() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CreateProduct",
        json!({"productCreate": {"product": product_node(1, "Shirt"), "userErrors": []}}),
    )
    .await;

    let input: ProductInput = serde_json::from_value(json!({
        "title": "Shirt",
        "vendor": "Acme",
        "status": "DRAFT"
    }))
    .unwrap();
    let product = client(&server).create_product(&input).await.unwrap();
    assert_eq!(product.id, "gid://shopify/Product/1");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(
        bodies[0]["variables"]["product"],
        json!({"title": "Shirt", "vendor": "Acme", "status": "DRAFT"})
    );
}

#[tokio::test]
async fn test_create_product_user_errors() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CreateProduct",
        json!({"productCreate": {
            "product": null,
            "userErrors": [{"field": ["title"], "message": "Title can't be blank"}]
        }}),
    )
    .await;

    let input: ProductInput = serde_json::from_value(json!({"title": ""})).unwrap();
    let error = client(&server).create_product(&input).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::User);
    assert_eq!(error.to_string(), "title: Title can't be blank");
}

#[tokio::test]
async fn test_update_product_normalizes_id() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "UpdateProduct",
        json!({"productUpdate": {"product": product_node(1, "Renamed"), "userErrors": []}}),
    )
    .await;

    let update = ProductUpdate {
        title: Some("Renamed".to_string()),
        ..ProductUpdate::default()
    };
    let product = client(&server).update_product("1", &update).await.unwrap();
    assert_eq!(product.title, "Renamed");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(
        bodies[0]["variables"]["product"],
        json!({"id": "gid://shopify/Product/1", "title": "Renamed"})
    );
}

#[tokio::test]
async fn test_create_variants_normalizes_product_id() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CreateProductVariants",
        json!({"productVariantsBulkCreate": {
            "productVariants": [{
                "id": "gid://shopify/ProductVariant/6",
                "title": "Blue",
                "price": "21.00",
                "selectedOptions": [{"name": "Color", "value": "Blue"}]
            }],
            "userErrors": []
        }}),
    )
    .await;

    let variants: Vec<VariantInput> = serde_json::from_value(json!([{
        "price": "21.00",
        "optionValues": [{"optionName": "Color", "name": "Blue"}]
    }]))
    .unwrap();
    let created = client(&server)
        .create_product_variants("1", &variants)
        .await
        .unwrap();
    assert_eq!(created[0].selected_options[0].value, "Blue");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["productId"], json!("gid://shopify/Product/1"));
    assert_eq!(bodies[0]["variables"]["variants"][0]["price"], json!("21.00"));
}

#[tokio::test]
async fn test_create_variants_user_errors() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "CreateProductVariants",
        json!({"productVariantsBulkCreate": {
            "productVariants": null,
            "userErrors": [{"field": ["variants", "0", "price"], "message": "Price is invalid", "code": "INVALID"}]
        }}),
    )
    .await;

    let error = client(&server)
        .create_product_variants("1", &[VariantInput::default()])
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::User);
    assert_eq!(error.to_string(), "variants.0.price: Price is invalid");
}

#[tokio::test]
async fn test_update_variants_normalizes_nested_ids() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "UpdateProductVariants",
        json!({"productVariantsBulkUpdate": {
            "productVariants": [
                {"id": "gid://shopify/ProductVariant/5", "title": "Default Title", "price": "25.00"},
                {"id": "gid://shopify/ProductVariant/6", "title": "Blue", "price": "25.00"}
            ],
            "userErrors": []
        }}),
    )
    .await;

    let variants: Vec<VariantUpdate> = serde_json::from_value(json!([
        {"id": "5", "price": "25.00"},
        {"id": "gid://shopify/ProductVariant/6", "price": "25.00"}
    ]))
    .unwrap();
    let updated = client(&server)
        .update_product_variants("gid://shopify/Product/1", &variants)
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["productId"], json!("gid://shopify/Product/1"));
    assert_eq!(
        bodies[0]["variables"]["variants"],
        json!([
            {"id": "gid://shopify/ProductVariant/5", "price": "25.00"},
            {"id": "gid://shopify/ProductVariant/6", "price": "25.00"}
        ])
    );
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_load_orders_sends_filters() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadOrders",
        json!({"orders": {
            "edges": [{"node": {
                "id": "gid://shopify/Order/8",
                "name": "#1008",
                "tags": null,
                "lineItems": {"edges": [{"node": {
                    "id": "gid://shopify/LineItem/1",
                    "title": "Shirt",
                    "quantity": 2,
                    "variant": null
                }}]}
            }}],
            "pageInfo": {"hasNextPage": false, "endCursor": null}
        }}),
    )
    .await;

    let params: LoadOrdersParams = serde_json::from_value(json!({
        "first": 3,
        "query": "financial_status:paid",
        "sortKey": "CREATED_AT",
        "reverse": true
    }))
    .unwrap();
    let page = client(&server).load_orders(&params).await.unwrap();

    assert_eq!(page.orders[0].name, "#1008");
    assert_eq!(page.orders[0].line_items[0].quantity, 2);
    assert!(page.next.is_none());

    let bodies = graphql_bodies(&server).await;
    let variables = &bodies[0]["variables"];
    assert_eq!(variables["first"], json!(3));
    assert_eq!(variables["sortKey"], json!("CREATED_AT"));
    assert_eq!(variables["reverse"], json!(true));
}

#[tokio::test]
async fn test_load_order_accepts_global_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("orders/450789469.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": {"id": 450_789_469, "name": "#1001", "financial_status": "paid"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = client(&server)
        .load_order("gid://shopify/Order/450789469")
        .await
        .unwrap();
    assert_eq!(order["name"], json!("#1001"));
}

#[tokio::test]
async fn test_missing_order_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rest_path("orders/1.json")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": "Not Found"})))
        .mount(&server)
        .await;

    let error = client(&server).load_order("1").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Request);
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
async fn test_tag_customer_reports_success() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "TagCustomer",
        json!({"tagsAdd": {"node": {"id": "gid://shopify/Customer/3"}, "userErrors": []}}),
    )
    .await;

    let tagged = client(&server)
        .tag_customer("3", &["vip".to_string()])
        .await
        .unwrap();
    assert!(tagged);

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["id"], json!("gid://shopify/Customer/3"));
    assert_eq!(bodies[0]["variables"]["tags"], json!(["vip"]));
}

// ============================================================================
// Webhooks
// ============================================================================

#[tokio::test]
async fn test_subscribe_requires_topic() {
    let server = MockServer::start().await;

    let error = client(&server)
        .manage_webhook(WebhookAction::Subscribe, "https://example.com/hook", None, None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Input);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_webhook_filters_by_topic() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "ListWebhooks",
        json!({"webhookSubscriptions": {"edges": [{"node": {
            "id": "gid://shopify/WebhookSubscription/10",
            "topic": "ORDERS_CREATE",
            "format": "JSON",
            "endpoint": {"__typename": "WebhookHttpEndpoint", "callbackUrl": "https://example.com/hook"}
        }}]}}),
    )
    .await;

    let outcome = client(&server)
        .manage_webhook(
            WebhookAction::Find,
            "https://example.com/hook",
            Some("orders/create"),
            None,
        )
        .await
        .unwrap();

    let subscription = outcome.subscription.unwrap();
    assert_eq!(subscription.callback_url.as_deref(), Some("https://example.com/hook"));

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["topics"], json!(["ORDERS_CREATE"]));
    assert_eq!(bodies[0]["variables"]["first"], json!(1));
}

#[tokio::test]
async fn test_unsubscribe_returns_deleted_id() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "UnsubscribeWebhook",
        json!({"webhookSubscriptionDelete": {
            "deletedWebhookSubscriptionId": "gid://shopify/WebhookSubscription/10",
            "userErrors": []
        }}),
    )
    .await;

    let outcome = client(&server)
        .manage_webhook(
            WebhookAction::Unsubscribe,
            "https://example.com/hook",
            None,
            Some("10"),
        )
        .await
        .unwrap();
    assert_eq!(
        outcome.deleted_id.as_deref(),
        Some("gid://shopify/WebhookSubscription/10")
    );
}

#[tokio::test]
async fn test_list_webhooks_filters_by_callback() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "ListWebhooks",
        json!({"webhookSubscriptions": {"edges": [
            {"node": {
                "id": "gid://shopify/WebhookSubscription/10",
                "topic": "ORDERS_CREATE",
                "endpoint": {"__typename": "WebhookHttpEndpoint", "callbackUrl": "https://example.com/hook"}
            }},
            {"node": {
                "id": "gid://shopify/WebhookSubscription/11",
                "topic": "PRODUCTS_UPDATE",
                "createdAt": "2026-01-01T00:00:00Z",
                "endpoint": {"__typename": "WebhookHttpEndpoint", "callbackUrl": "https://example.com/hook"}
            }}
        ]}}),
    )
    .await;

    let subscriptions = client(&server)
        .list_webhooks(Some("https://example.com/hook"))
        .await
        .unwrap();
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[1].topic, "PRODUCTS_UPDATE");
    assert_eq!(subscriptions[1].created_at.as_deref(), Some("2026-01-01T00:00:00Z"));

    let bodies = graphql_bodies(&server).await;
    assert_eq!(bodies[0]["variables"]["callbackUrl"], json!("https://example.com/hook"));
    assert_eq!(bodies[0]["variables"]["topics"], json!(null));
    assert_eq!(bodies[0]["variables"]["first"], json!(100));
}

// ============================================================================
// Metafields
// ============================================================================

#[tokio::test]
async fn test_bare_owner_id_needs_type() {
    let server = MockServer::start().await;

    let error = client(&server)
        .load_metafields("1", None, None, 10)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Input);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_metafields_targets_owner() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "SetMetafields",
        json!({"metafieldsSet": {
            "metafields": [{
                "id": "gid://shopify/Metafield/1",
                "namespace": "custom",
                "key": "fabric",
                "value": "cotton",
                "type": "single_line_text_field"
            }],
            "userErrors": []
        }}),
    )
    .await;

    let inputs: Vec<MetafieldInput> = serde_json::from_value(json!([{
        "namespace": "custom",
        "key": "fabric",
        "value": "cotton",
        "type": "single_line_text_field"
    }]))
    .unwrap();
    let stored = client(&server)
        .set_metafields("1", Some(ResourceType::Product), &inputs)
        .await
        .unwrap();
    assert_eq!(stored[0].key, "fabric");

    let bodies = graphql_bodies(&server).await;
    assert_eq!(
        bodies[0]["variables"]["metafields"][0]["ownerId"],
        json!("gid://shopify/Product/1")
    );
}

#[tokio::test]
async fn test_load_metafields_for_global_owner() {
    let server = MockServer::start().await;
    mock_graphql(
        &server,
        "LoadMetafields",
        json!({"node": {
            "id": "gid://shopify/Customer/3",
            "metafields": {"edges": [{"node": {
                "id": "gid://shopify/Metafield/5",
                "namespace": "loyalty",
                "key": "tier",
                "value": "gold",
                "type": "single_line_text_field"
            }}]}
        }}),
    )
    .await;

    let metafields = client(&server)
        .load_metafields("gid://shopify/Customer/3", None, Some("loyalty"), 10)
        .await
        .unwrap();
    assert_eq!(metafields.len(), 1);
    assert_eq!(metafields[0].value.as_deref(), Some("gold"));
}
