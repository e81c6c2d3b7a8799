//! MCP tool surface.
//!
//! [`ShopifyMcpServer`] registers one tool per [`ShopifyClient`] operation.
//! Each call builds a fresh client from the configured credential, runs the
//! operation, and renders the result with [`format`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rmcp::{transport::stdio, ServiceExt};
//! use shopify_mcp::mcp::ShopifyMcpServer;
//!
//! let server = ShopifyMcpServer::new(credential, config);
//! server.serve(stdio()).await?.waiting().await?;
//! ```

pub mod format;
pub mod schemas;

use std::future::Future;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use serde_json::json;

use crate::admin::{
    BasicDiscountInput, CollectionInput, DraftOrderInput, LoadOrdersParams, PriceRuleInput,
    ProductInput, ShopifyClient,
};
use crate::clients::{ErrorContext, ShopifyError};
use crate::config::{ClientConfig, StoreCredential};
use crate::gid::ResourceType;
use schemas::{
    CollectionIdParams, CollectionProductsParams, CompleteDraftOrderParams,
    CreateDiscountCodeParams, CreateMediaParams, CreateVariantsParams, DeleteDiscountCodeParams,
    DiscountIdParams, GetCollectionsParams, GetCustomersParams, GetMetafieldsParams,
    GetProductsParams, ListWebhooksParams, ManageWebhookParams, OrderIdParams, PriceRuleIdParams,
    ProductIdParams, ProductIdsParams, ProductsByCollectionParams, SetMetafieldsParams,
    TagCustomerParams, UpdateCollectionParams, UpdateProductParams, UpdateVariantsParams,
    VariantIdsParams,
};

const INSTRUCTIONS: &str = "Tools for one Shopify store through the Admin API. \
Ids may be numeric or gid://shopify/<Type>/<id>. \
Paginated tools return a `next` cursor; pass it back to get the following page.";

/// MCP server exposing Shopify Admin API tools for one store.
#[derive(Clone)]
pub struct ShopifyMcpServer {
    credential: StoreCredential,
    config: ClientConfig,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ShopifyMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyMcpServer")
            .field("store", &self.credential.store)
            .field("api_version", self.config.api_version())
            .finish_non_exhaustive()
    }
}

/// Parses an optional owner type name such as `Product`.
fn owner_type(name: Option<&str>) -> Result<Option<ResourceType>, ShopifyError> {
    name.map(|name| {
        ResourceType::parse(name).ok_or_else(|| {
            ShopifyError::input(
                format!("Unknown owner type '{name}'"),
                ErrorContext::with_params(json!({ "owner_type": name })),
            )
        })
    })
    .transpose()
}

impl ShopifyMcpServer {
    /// Creates a server for `credential`.
    #[must_use]
    pub fn new(credential: StoreCredential, config: ClientConfig) -> Self {
        Self {
            credential,
            config,
            tool_router: Self::tool_router(),
        }
    }

    async fn call<T, F, Fut>(
        &self,
        tool: &'static str,
        default_message: &'static str,
        operation: F,
    ) -> Result<CallToolResult, ErrorData>
    where
        T: Serialize,
        F: FnOnce(ShopifyClient) -> Fut,
        Fut: Future<Output = Result<T, ShopifyError>>,
    {
        tracing::debug!(tool, store = %self.credential.store, "tool call");
        let result = match ShopifyClient::new(&self.credential, &self.config) {
            Ok(client) => operation(client).await,
            Err(error) => Err(error),
        };
        Ok(format::render(tool, default_message, result))
    }
}

#[tool_router]
impl ShopifyMcpServer {
    // ------------------------------------------------------------------
    // Shop
    // ------------------------------------------------------------------

    #[tool(
        name = "get-shop",
        annotations(read_only_hint = true),
        description = "Get the shop record: name, domains, currency, plan."
    )]
    async fn get_shop(&self) -> Result<CallToolResult, ErrorData> {
        self.call("get-shop", "Failed to fetch shop", |client| async move {
            client.load_shop().await
        })
        .await
    }

    #[tool(
        name = "get-shop-details",
        annotations(read_only_hint = true),
        description = "Get extended shop details, including the countries the shop ships to."
    )]
    async fn get_shop_details(&self) -> Result<CallToolResult, ErrorData> {
        self.call("get-shop-details", "Failed to fetch shop details", |client| async move {
            client.load_shop_details().await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    #[tool(
        name = "get-products",
        annotations(read_only_hint = true),
        description = "Get products, optionally filtered by a title substring. Returns products, a `next` cursor, and the shop currency."
    )]
    async fn get_products(
        &self,
        params: Parameters<GetProductsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-products", "Failed to fetch products", move |client| async move {
            client
                .load_products(p.search_title.as_deref(), p.limit, p.after.as_deref())
                .await
        })
        .await
    }

    #[tool(
        name = "get-products-by-collection",
        annotations(read_only_hint = true),
        description = "Get the products of a collection."
    )]
    async fn get_products_by_collection(
        &self,
        params: Parameters<ProductsByCollectionParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call(
            "get-products-by-collection",
            "Failed to fetch products from collection",
            move |client| async move {
                client
                    .load_products_by_collection_id(&p.collection_id, p.limit, p.after.as_deref())
                    .await
            },
        )
        .await
    }

    #[tool(
        name = "get-products-by-ids",
        annotations(read_only_hint = true),
        description = "Get products by id. Unknown ids are skipped."
    )]
    async fn get_products_by_ids(
        &self,
        params: Parameters<ProductIdsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-products-by-ids", "Failed to fetch products by ids", move |client| async move {
            client.load_products_by_ids(&p.product_ids).await
        })
        .await
    }

    #[tool(
        name = "get-variants-by-ids",
        annotations(read_only_hint = true),
        description = "Get product variants by id, with their parent product."
    )]
    async fn get_variants_by_ids(
        &self,
        params: Parameters<VariantIdsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-variants-by-ids", "Failed to fetch variants by ids", move |client| async move {
            client.load_variants_by_ids(&p.variant_ids).await
        })
        .await
    }

    #[tool(name = "create-product", description = "Create a product.")]
    async fn create_product(
        &self,
        params: Parameters<ProductInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        self.call("create-product", "Failed to create product", move |client| async move {
            client.create_product(&input).await
        })
        .await
    }

    #[tool(
        name = "update-product",
        description = "Update the given fields of a product. Omitted fields are left unchanged."
    )]
    async fn update_product(
        &self,
        params: Parameters<UpdateProductParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("update-product", "Failed to update product", move |client| async move {
            client.update_product(&p.product_id, &p.update).await
        })
        .await
    }

    #[tool(
        name = "delete-product",
        annotations(destructive_hint = true),
        description = "Delete a product. Returns the deleted product id."
    )]
    async fn delete_product(
        &self,
        params: Parameters<ProductIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("delete-product", "Failed to delete product", move |client| async move {
            client.delete_product(&p.product_id).await
        })
        .await
    }

    #[tool(name = "create-product-variants", description = "Add variants to a product.")]
    async fn create_product_variants(
        &self,
        params: Parameters<CreateVariantsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call(
            "create-product-variants",
            "Failed to create product variants",
            move |client| async move { client.create_product_variants(&p.product_id, &p.variants).await },
        )
        .await
    }

    #[tool(name = "update-product-variants", description = "Update variants of a product.")]
    async fn update_product_variants(
        &self,
        params: Parameters<UpdateVariantsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call(
            "update-product-variants",
            "Failed to update product variants",
            move |client| async move { client.update_product_variants(&p.product_id, &p.variants).await },
        )
        .await
    }

    #[tool(
        name = "create-product-media",
        description = "Attach images, videos, or 3D models to a product from external URLs."
    )]
    async fn create_product_media(
        &self,
        params: Parameters<CreateMediaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("create-product-media", "Failed to create product media", move |client| async move {
            client.create_product_media(&p.product_id, &p.media).await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Customers and orders
    // ------------------------------------------------------------------

    #[tool(
        name = "get-customers",
        annotations(read_only_hint = true),
        description = "Get customers (id, email, tags). Returns a `next` cursor when more pages exist."
    )]
    async fn get_customers(
        &self,
        params: Parameters<GetCustomersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-customers", "Failed to fetch customers", move |client| async move {
            client.load_customers(p.limit, p.next.as_deref()).await
        })
        .await
    }

    #[tool(name = "tag-customer", description = "Add tags to a customer.")]
    async fn tag_customer(
        &self,
        params: Parameters<TagCustomerParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("tag-customer", "Failed to tag customer", move |client| async move {
            client.tag_customer(&p.customer_id, &p.tags).await
        })
        .await
    }

    #[tool(
        name = "get-orders",
        annotations(read_only_hint = true),
        description = "Get orders with optional search query, sort key, and cursor."
    )]
    async fn get_orders(
        &self,
        params: Parameters<LoadOrdersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-orders", "Failed to fetch orders", move |client| async move {
            client.load_orders(&p).await
        })
        .await
    }

    #[tool(
        name = "get-order",
        annotations(read_only_hint = true),
        description = "Get one order by id."
    )]
    async fn get_order(&self, params: Parameters<OrderIdParams>) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-order", "Failed to fetch order", move |client| async move {
            client.load_order(&p.order_id).await
        })
        .await
    }

    #[tool(name = "create-draft-order", description = "Create a draft order.")]
    async fn create_draft_order(
        &self,
        params: Parameters<DraftOrderInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        self.call("create-draft-order", "Failed to create draft order", move |client| async move {
            client.create_draft_order(&input).await
        })
        .await
    }

    #[tool(
        name = "complete-draft-order",
        description = "Complete a draft order into an order. Fails if the given variant does not exist or is not available for sale."
    )]
    async fn complete_draft_order(
        &self,
        params: Parameters<CompleteDraftOrderParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("complete-draft-order", "Failed to complete draft order", move |client| async move {
            client
                .complete_draft_order(&p.draft_order_id, &p.variant_id)
                .await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Discounts
    // ------------------------------------------------------------------

    #[tool(
        name = "create-discount",
        description = "Create a basic discount code. Percentage values are fractions between 0 and 1; fixed amounts must be positive."
    )]
    async fn create_discount(
        &self,
        params: Parameters<BasicDiscountInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        self.call("create-discount", "Failed to create discount", move |client| async move {
            client.create_basic_discount_code(&input).await
        })
        .await
    }

    #[tool(
        name = "delete-discount",
        annotations(destructive_hint = true),
        description = "Delete a code discount."
    )]
    async fn delete_discount(
        &self,
        params: Parameters<DiscountIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("delete-discount", "Failed to delete discount", move |client| async move {
            client.delete_basic_discount_code(&p.discount_id).await
        })
        .await
    }

    #[tool(name = "create-price-rule", description = "Create a price rule for all customers.")]
    async fn create_price_rule(
        &self,
        params: Parameters<PriceRuleInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        self.call("create-price-rule", "Failed to create price rule", move |client| async move {
            client.create_price_rule(&input).await
        })
        .await
    }

    #[tool(name = "create-discount-code", description = "Create a discount code under a price rule.")]
    async fn create_discount_code(
        &self,
        params: Parameters<CreateDiscountCodeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("create-discount-code", "Failed to create discount code", move |client| async move {
            client.create_discount_code(&p.price_rule_id, &p.code).await
        })
        .await
    }

    #[tool(
        name = "delete-price-rule",
        annotations(destructive_hint = true),
        description = "Delete a price rule and its discount codes."
    )]
    async fn delete_price_rule(
        &self,
        params: Parameters<PriceRuleIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("delete-price-rule", "Failed to delete price rule", move |client| async move {
            client
                .delete_price_rule(&p.price_rule_id)
                .await
                .map(|()| json!({ "deleted": true }))
        })
        .await
    }

    #[tool(
        name = "delete-discount-code",
        annotations(destructive_hint = true),
        description = "Delete one discount code of a price rule."
    )]
    async fn delete_discount_code(
        &self,
        params: Parameters<DeleteDiscountCodeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("delete-discount-code", "Failed to delete discount code", move |client| async move {
            client
                .delete_discount_code(&p.price_rule_id, &p.discount_code_id)
                .await
                .map(|()| json!({ "deleted": true }))
        })
        .await
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    #[tool(
        name = "get-collections",
        annotations(read_only_hint = true),
        description = "Get custom and smart collections, merged. Pass the returned `next` cursor back unchanged for the following page."
    )]
    async fn get_collections(
        &self,
        params: Parameters<GetCollectionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-collections", "Failed to fetch collections", move |client| async move {
            client.load_collections(&p.filters, p.next.as_deref()).await
        })
        .await
    }

    #[tool(
        name = "create-collection",
        description = "Create a collection. Give a rule set for a smart collection or product ids for a custom one."
    )]
    async fn create_collection(
        &self,
        params: Parameters<CollectionInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = params.0;
        self.call("create-collection", "Failed to create collection", move |client| async move {
            client.create_collection(&input).await
        })
        .await
    }

    #[tool(name = "update-collection", description = "Update title, description, or handle of a collection.")]
    async fn update_collection(
        &self,
        params: Parameters<UpdateCollectionParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("update-collection", "Failed to update collection", move |client| async move {
            client.update_collection(&p.collection_id, &p.update).await
        })
        .await
    }

    #[tool(name = "add-products-to-collection", description = "Add products to a custom collection.")]
    async fn add_products_to_collection(
        &self,
        params: Parameters<CollectionProductsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call(
            "add-products-to-collection",
            "Failed to add products to collection",
            move |client| async move {
                client
                    .add_products_to_collection(&p.collection_id, &p.product_ids)
                    .await
            },
        )
        .await
    }

    #[tool(
        name = "remove-products-from-collection",
        description = "Remove products from a custom collection. Returns the id of the background job."
    )]
    async fn remove_products_from_collection(
        &self,
        params: Parameters<CollectionProductsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call(
            "remove-products-from-collection",
            "Failed to remove products from collection",
            move |client| async move {
                client
                    .remove_products_from_collection(&p.collection_id, &p.product_ids)
                    .await
            },
        )
        .await
    }

    #[tool(
        name = "delete-collection",
        annotations(destructive_hint = true),
        description = "Delete a collection."
    )]
    async fn delete_collection(
        &self,
        params: Parameters<CollectionIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("delete-collection", "Failed to delete collection", move |client| async move {
            client.delete_collection(&p.collection_id).await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Webhooks and metafields
    // ------------------------------------------------------------------

    #[tool(
        name = "manage-webhook",
        description = "Subscribe, find, or unsubscribe a webhook for a callback URL."
    )]
    async fn manage_webhook(
        &self,
        params: Parameters<ManageWebhookParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("manage-webhook", "Failed to manage webhook", move |client| async move {
            client
                .manage_webhook(
                    p.action,
                    &p.callback_url,
                    p.topic.as_deref(),
                    p.webhook_id.as_deref(),
                )
                .await
        })
        .await
    }

    #[tool(
        name = "list-webhooks",
        annotations(read_only_hint = true),
        description = "List webhook subscriptions, optionally for one callback URL."
    )]
    async fn list_webhooks(
        &self,
        params: Parameters<ListWebhooksParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("list-webhooks", "Failed to list webhooks", move |client| async move {
            client.list_webhooks(p.callback_url.as_deref()).await
        })
        .await
    }

    #[tool(
        name = "set-metafields",
        description = "Set metafields on a resource. A numeric owner id needs an owner type."
    )]
    async fn set_metafields(
        &self,
        params: Parameters<SetMetafieldsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("set-metafields", "Failed to set metafields", move |client| async move {
            let kind = owner_type(p.owner_type.as_deref())?;
            client
                .set_metafields(&p.owner_id, kind, &p.metafields)
                .await
        })
        .await
    }

    #[tool(
        name = "get-metafields",
        annotations(read_only_hint = true),
        description = "Get the metafields of a resource. A numeric owner id needs an owner type."
    )]
    async fn get_metafields(
        &self,
        params: Parameters<GetMetafieldsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let p = params.0;
        self.call("get-metafields", "Failed to fetch metafields", move |client| async move {
            let kind = owner_type(p.owner_type.as_deref())?;
            client
                .load_metafields(&p.owner_id, kind, p.namespace.as_deref(), p.first)
                .await
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for ShopifyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "shopify-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Shopify MCP Server".to_string()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> ShopifyMcpServer {
        let credential = StoreCredential::parse("shpat_test", "test-shop").unwrap();
        ShopifyMcpServer::new(credential, ClientConfig::default())
    }

    #[test]
    fn test_registers_every_tool() {
        let names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(names.len(), 34);
        for name in ["get-shop", "create-discount", "get-collections", "get-metafields"] {
            assert!(names.iter().any(|n| n == name), "missing tool {name}");
        }
    }

    #[test]
    fn test_owner_type_parsing() {
        assert_eq!(owner_type(None).unwrap(), None);
        assert_eq!(owner_type(Some("product")).unwrap(), Some(ResourceType::Product));
        let error = owner_type(Some("Widget")).unwrap_err();
        assert!(error.to_string().contains("Unknown owner type"));
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", server());
        assert!(!debug.contains("shpat_test"));
        assert!(debug.contains("test-shop.myshopify.com"));
    }
}
