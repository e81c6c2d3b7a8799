use schemars::JsonSchema;
use serde::Deserialize;

use crate::admin::types::default_page_size;
use crate::admin::{
    CollectionUpdate, LoadCollectionsParams, MediaInput, MetafieldInput,
    ProductUpdate, VariantInput, VariantUpdate, WebhookAction,
};

/// Parameters for `get-products`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsParams {
    #[schemars(description = "Only products whose title contains this text.")]
    #[serde(default)]
    pub search_title: Option<String>,
    #[schemars(description = "Maximum number of products to return.")]
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[schemars(description = "Cursor from the previous page's `next` field.")]
    #[serde(default)]
    pub after: Option<String>,
}

/// Parameters for `get-products-by-collection`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductsByCollectionParams {
    #[schemars(description = "Collection id, numeric or gid://shopify/Collection/<id>.")]
    pub collection_id: String,
    #[schemars(description = "Maximum number of products to return.")]
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[schemars(description = "Cursor from the previous page's `next` field.")]
    #[serde(default)]
    pub after: Option<String>,
}

/// Parameters for `get-products-by-ids`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdsParams {
    #[schemars(description = "Product ids, numeric or global ids.")]
    pub product_ids: Vec<String>,
}

/// Parameters for `get-variants-by-ids`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VariantIdsParams {
    #[schemars(description = "Variant ids, numeric or global ids.")]
    pub variant_ids: Vec<String>,
}

/// Parameters for `update-product`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductParams {
    #[schemars(description = "Product id, numeric or global id.")]
    pub product_id: String,
    #[serde(flatten)]
    pub update: ProductUpdate,
}

/// Parameters for tools addressing a single product.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdParams {
    #[schemars(description = "Product id, numeric or global id.")]
    pub product_id: String,
}

/// Parameters for `create-product-variants`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantsParams {
    #[schemars(description = "Product the variants belong to.")]
    pub product_id: String,
    #[schemars(description = "Variants to create.")]
    pub variants: Vec<VariantInput>,
}

/// Parameters for `update-product-variants`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariantsParams {
    #[schemars(description = "Product the variants belong to.")]
    pub product_id: String,
    #[schemars(description = "Variants to update; each needs its id.")]
    pub variants: Vec<VariantUpdate>,
}

/// Parameters for `create-product-media`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaParams {
    #[schemars(description = "Product to attach the media to.")]
    pub product_id: String,
    #[schemars(description = "Media items to create.")]
    pub media: Vec<MediaInput>,
}

/// Parameters for `get-customers`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomersParams {
    #[schemars(description = "Maximum number of customers to return.")]
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[schemars(description = "Cursor from the previous page's `next` field.")]
    #[serde(default)]
    pub next: Option<String>,
}

/// Parameters for `tag-customer`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TagCustomerParams {
    #[schemars(description = "Customer id, numeric or global id.")]
    pub customer_id: String,
    #[schemars(description = "Tags to add.")]
    pub tags: Vec<String>,
}

/// Parameters for `get-order`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdParams {
    #[schemars(description = "Order id, numeric or global id.")]
    pub order_id: String,
}

/// Parameters for `complete-draft-order`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompleteDraftOrderParams {
    #[schemars(description = "Draft order id, numeric or global id.")]
    pub draft_order_id: String,
    #[schemars(description = "Variant that must be available for sale before completing.")]
    pub variant_id: String,
}

/// Parameters for `delete-discount`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DiscountIdParams {
    #[schemars(description = "Code discount id, numeric or gid://shopify/DiscountCodeNode/<id>.")]
    pub discount_id: String,
}

/// Parameters for `create-discount-code`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscountCodeParams {
    #[schemars(description = "Price rule the code belongs to.")]
    pub price_rule_id: String,
    #[schemars(description = "The code customers enter at checkout.")]
    pub code: String,
}

/// Parameters for `delete-price-rule`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceRuleIdParams {
    #[schemars(description = "Price rule id, numeric or global id.")]
    pub price_rule_id: String,
}

/// Parameters for `delete-discount-code`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDiscountCodeParams {
    #[schemars(description = "Price rule the code belongs to.")]
    pub price_rule_id: String,
    #[schemars(description = "Discount code id, numeric or global id.")]
    pub discount_code_id: String,
}

/// Parameters for `get-collections`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionsParams {
    #[serde(flatten)]
    pub filters: LoadCollectionsParams,
    #[schemars(description = "Composite cursor from the previous page's `next` field.")]
    #[serde(default)]
    pub next: Option<String>,
}

/// Parameters for `update-collection`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionParams {
    #[schemars(description = "Collection id, numeric or global id.")]
    pub collection_id: String,
    #[serde(flatten)]
    pub update: CollectionUpdate,
}

/// Parameters for adding or removing collection products.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductsParams {
    #[schemars(description = "Collection id, numeric or global id.")]
    pub collection_id: String,
    #[schemars(description = "Product ids, numeric or global ids.")]
    pub product_ids: Vec<String>,
}

/// Parameters for `delete-collection`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionIdParams {
    #[schemars(description = "Collection id, numeric or global id.")]
    pub collection_id: String,
}

/// Parameters for `manage-webhook`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManageWebhookParams {
    #[schemars(description = "subscribe, find, or unsubscribe.")]
    pub action: WebhookAction,
    #[schemars(description = "HTTPS endpoint receiving the webhook.")]
    pub callback_url: String,
    #[schemars(description = "Topic such as orders/create; required for subscribe and find.")]
    #[serde(default)]
    pub topic: Option<String>,
    #[schemars(description = "Subscription id; required for unsubscribe.")]
    #[serde(default)]
    pub webhook_id: Option<String>,
}

/// Parameters for `list-webhooks`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListWebhooksParams {
    #[schemars(description = "Only subscriptions for this endpoint.")]
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Parameters for `set-metafields`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetMetafieldsParams {
    #[schemars(description = "Owner resource id, numeric or global id.")]
    pub owner_id: String,
    #[schemars(description = "Owner resource type, e.g. Product; required for numeric ids.")]
    #[serde(default)]
    pub owner_type: Option<String>,
    #[schemars(description = "Metafields to set.")]
    pub metafields: Vec<MetafieldInput>,
}

/// Parameters for `get-metafields`.
#[derive(JsonSchema, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GetMetafieldsParams {
    #[schemars(description = "Owner resource id, numeric or global id.")]
    pub owner_id: String,
    #[schemars(description = "Owner resource type, e.g. Product; required for numeric ids.")]
    #[serde(default)]
    pub owner_type: Option<String>,
    #[schemars(description = "Only metafields in this namespace.")]
    #[serde(default)]
    pub namespace: Option<String>,
    #[schemars(description = "Maximum number of metafields to return.")]
    #[serde(default = "default_page_size")]
    pub first: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_size_defaults() {
        let params: GetProductsParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.limit, 10);
        assert!(params.search_title.is_none());
    }

    #[test]
    fn test_collection_filters_flatten() {
        let params: GetCollectionsParams = serde_json::from_value(json!({
            "limit": 5,
            "name": "Summer",
            "next": "a,undefined"
        }))
        .unwrap();
        assert_eq!(params.filters.limit, 5);
        assert_eq!(params.filters.name.as_deref(), Some("Summer"));
        assert_eq!(params.next.as_deref(), Some("a,undefined"));
    }

    #[test]
    fn test_webhook_action_names() {
        let params: ManageWebhookParams = serde_json::from_value(json!({
            "action": "unsubscribe",
            "callbackUrl": "https://example.com/hook",
            "webhookId": "1"
        }))
        .unwrap();
        assert_eq!(params.action, WebhookAction::Unsubscribe);
        assert!(params.topic.is_none());
    }
}
