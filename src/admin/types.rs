//! Result records and input types for domain operations.
//!
//! GraphQL records mirror the Admin API field names (camelCase) and flatten
//! `edges { node }` connections into plain lists. REST records keep the REST
//! snake_case names.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

/// Pagination state of a GraphQL connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows.
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor of the last edge on this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Returns the cursor to continue from, or `None` on the last page.
    #[must_use]
    pub fn next_cursor(self) -> Option<String> {
        if self.has_next_page {
            self.end_cursor
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
    #[serde(default)]
    pub(crate) page_info: PageInfo,
}

impl<T> Connection<T> {
    pub(crate) fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// Deserializes `{ edges: [{ node }] }` (or `null`) into the list of nodes.
fn edges<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let connection = Option::<Connection<T>>::deserialize(deserializer)?;
    Ok(connection.map(Connection::into_nodes).unwrap_or_default())
}

/// Deserializes `null` as the default value.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// A monetary amount.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as a string.
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// A monetary amount in shop currency.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBag {
    /// Amount in the shop's currency.
    pub shop_money: Money,
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// The shop record returned by the REST `shop.json` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Shop {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    pub myshopify_domain: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub iana_timezone: Option<String>,
}

/// The store's primary domain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Domain {
    pub host: String,
    pub url: String,
}

/// Shop details read through GraphQL.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub currency_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub ships_to_countries: Vec<String>,
    #[serde(default)]
    pub myshopify_domain: Option<String>,
    #[serde(default)]
    pub primary_domain: Option<Domain>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Minimum and maximum variant prices of a product.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

/// A product image.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A selected option value on a variant.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A product variant.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub available_for_sale: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub selected_options: Vec<SelectedOption>,
}

/// A product with its first image and variants.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub total_inventory: Option<i64>,
    #[serde(default)]
    pub price_range_v2: Option<PriceRange>,
    #[serde(default, deserialize_with = "edges")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "edges")]
    pub variants: Vec<ProductVariant>,
}

/// One page of products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPage {
    pub products: Vec<Product>,
    /// Cursor for the following page, absent on the last page.
    pub next: Option<String>,
    /// The shop's currency, for rendering prices.
    pub currency_code: String,
}

/// Identifying fields of a variant's parent product.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductRef {
    pub id: String,
    pub title: String,
}

/// A variant together with its parent product.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantWithProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    pub product: ProductRef,
}

/// Publication status of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
}

/// Fields of a new product.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Product title.
    pub title: String,
    /// Description, as HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Vendor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Product type used for grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Initial status; the API defaults to ACTIVE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

/// Fields to change on an existing product. Absent fields are left as is.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, as HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// New vendor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// New product type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

/// Inventory item fields of a variant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemInput {
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Whether inventory is tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked: Option<bool>,
}

/// An option value of a variant, e.g. `Color` = `Blue`.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionValue {
    /// Name of the product option.
    pub option_name: String,
    /// Value for this variant.
    pub name: String,
}

/// Fields of a new variant.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    /// Price as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Compare-at price as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    /// Barcode (ISBN, UPC, GTIN).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Inventory item fields such as SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItemInput>,
    /// Option values identifying the variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_values: Vec<VariantOptionValue>,
}

/// Fields to change on an existing variant.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantUpdate {
    /// Variant id, numeric or `gid://` form.
    pub id: String,
    /// New price as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// New compare-at price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    /// New barcode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Inventory item fields such as SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItemInput>,
    /// Replacement option values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_values: Vec<VariantOptionValue>,
}

/// Kind of media attached to a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaContentType {
    Image,
    Video,
    ExternalVideo,
    #[serde(rename = "MODEL_3D")]
    Model3d,
}

/// A media file to attach to a product.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaInput {
    /// Public URL of the source file.
    pub original_source: String,
    /// Alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Kind of media.
    pub media_content_type: MediaContentType,
}

/// Media attached to a product.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub media_content_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// A customer as listed by the REST `customers.json` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomerSummary {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    /// Comma-separated tags.
    #[serde(default, deserialize_with = "null_default")]
    pub tags: String,
}

/// One page of customers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomersPage {
    pub customers: Vec<CustomerSummary>,
    /// `page_info` token for the following page.
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Customer summary attached to an order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A postal address.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country_code_v2: Option<String>,
}

/// Variant summary on an order line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineItemVariant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
}

/// A line of an order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub id: String,
    pub title: String,
    pub quantity: i64,
    #[serde(default)]
    pub original_total_set: Option<MoneyBag>,
    #[serde(default)]
    pub variant: Option<LineItemVariant>,
}

/// An order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub display_financial_status: Option<String>,
    #[serde(default)]
    pub display_fulfillment_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total_price_set: Option<MoneyBag>,
    #[serde(default)]
    pub subtotal_price_set: Option<MoneyBag>,
    #[serde(default)]
    pub total_shipping_price_set: Option<MoneyBag>,
    #[serde(default)]
    pub total_tax_set: Option<MoneyBag>,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub shipping_address: Option<MailingAddress>,
    #[serde(default, deserialize_with = "edges")]
    pub line_items: Vec<OrderLineItem>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// One page of orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    /// Cursor for the following page.
    pub next: Option<String>,
}

/// Sort keys accepted by the orders query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSortKey {
    CreatedAt,
    CustomerName,
    FinancialStatus,
    FulfillmentStatus,
    Id,
    OrderNumber,
    ProcessedAt,
    TotalPrice,
    UpdatedAt,
}

/// Parameters of an order listing.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadOrdersParams {
    /// Page size.
    #[serde(default = "default_page_size")]
    pub first: u32,
    /// Cursor returned by the previous page.
    #[serde(default)]
    pub after: Option<String>,
    /// Search query, e.g. `financial_status:paid`.
    #[serde(default)]
    pub query: Option<String>,
    /// Sort key.
    #[serde(default)]
    pub sort_key: Option<OrderSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    pub reverse: Option<bool>,
}

impl Default for LoadOrdersParams {
    fn default() -> Self {
        Self {
            first: default_page_size(),
            after: None,
            query: None,
            sort_key: None,
            reverse: None,
        }
    }
}

pub(crate) const fn default_page_size() -> u32 {
    10
}

// ---------------------------------------------------------------------------
// Draft orders
// ---------------------------------------------------------------------------

/// A variant and quantity on a draft order.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftLineItem {
    /// Variant id, numeric or `gid://` form.
    pub variant_id: String,
    /// Quantity, at least 1.
    pub quantity: u32,
}

/// A postal address for a draft order.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Province or state code, e.g. `ON`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    /// Two-letter country code, e.g. `CA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Fields of a new draft order.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderInput {
    /// Lines to order.
    pub line_items: Vec<DraftLineItem>,
    /// Customer email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressInput>,
    /// Billing address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressInput>,
    /// Internal note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A created draft order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub total_price_set: Option<MoneyBag>,
}

/// Outcome of completing a draft order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDraftOrder {
    pub draft_order_id: String,
    pub draft_order_name: String,
    /// The order created from the draft.
    pub order_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Discounts
// ---------------------------------------------------------------------------

/// How a discount value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValueType {
    /// A fraction of the price, between 0 and 1.
    Percentage,
    /// A fixed amount in shop currency.
    FixedAmount,
}

/// Which other discount classes may stack with this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinesWith {
    #[serde(default = "yes")]
    pub product_discounts: bool,
    #[serde(default = "yes")]
    pub order_discounts: bool,
    #[serde(default = "yes")]
    pub shipping_discounts: bool,
}

impl Default for CombinesWith {
    fn default() -> Self {
        Self {
            product_discounts: true,
            order_discounts: true,
            shipping_discounts: true,
        }
    }
}

const fn yes() -> bool {
    true
}

/// Fields of a basic discount code.
#[derive(Clone, Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicDiscountInput {
    /// Internal title.
    pub title: String,
    /// The code customers enter at checkout.
    pub code: String,
    /// Percentage or fixed amount.
    pub value_type: DiscountValueType,
    /// Fraction between 0 and 1 for percentages, positive amount otherwise.
    pub value: f64,
    /// Start of the validity period (ISO 8601).
    pub starts_at: DateTime<Utc>,
    /// End of the validity period (ISO 8601).
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Total number of uses allowed.
    #[serde(default)]
    pub usage_limit: Option<u32>,
    /// Limit each customer to one use.
    #[serde(default = "yes")]
    pub applies_once_per_customer: bool,
    /// Restrict the discount to these collections; all items when empty.
    #[serde(default)]
    pub include_collection_ids: Vec<String>,
    /// Stacking rules.
    #[serde(default)]
    pub combines_with: CombinesWith,
}

/// A created basic discount code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BasicDiscountCode {
    pub id: String,
    pub code: String,
}

/// What a price rule applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRuleTarget {
    LineItem,
    ShippingLine,
}

/// How a price rule value is spread over entitled lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRuleAllocation {
    Each,
    Across,
}

/// Fields of a new price rule.
#[derive(Clone, Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRuleInput {
    /// Internal title.
    pub title: String,
    /// Line items or shipping lines.
    pub target: PriceRuleTarget,
    /// Percentage or fixed amount.
    pub value_type: DiscountValueType,
    /// Value of the rule, sent unchanged.
    pub value: f64,
    /// Allocation across entitled lines.
    pub allocation_method: PriceRuleAllocation,
    /// Start of the validity period (ISO 8601).
    pub starts_at: DateTime<Utc>,
    /// End of the validity period (ISO 8601).
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Total number of uses allowed.
    #[serde(default)]
    pub usage_limit: Option<u32>,
    /// Limit each customer to one use.
    #[serde(default)]
    pub once_per_customer: bool,
}

/// A created price rule.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceRule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A discount code created under a price rule.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscountCode {
    pub id: String,
    pub code: String,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Which REST endpoint a collection came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    #[default]
    Custom,
    Smart,
}

/// A collection as listed by the REST collection endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(skip_deserializing)]
    pub kind: CollectionKind,
}

/// Filters of a collection listing.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadCollectionsParams {
    /// Page size per collection kind.
    #[serde(default = "default_page_size")]
    pub limit: u32,
    /// Only collections with this exact title.
    #[serde(default)]
    pub name: Option<String>,
    /// Only collections with an id greater than this.
    #[serde(default)]
    pub since_id: Option<u64>,
}

impl Default for LoadCollectionsParams {
    fn default() -> Self {
        Self {
            limit: default_page_size(),
            name: None,
            since_id: None,
        }
    }
}

/// One merged page of custom and smart collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionsPage {
    pub collections: Vec<CollectionSummary>,
    /// Composite cursor `<custom>,<smart>`, absent when both kinds are exhausted.
    pub next: Option<String>,
}

/// A rule of a smart collection, e.g. `TAG` `EQUALS` `summer`.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct CollectionRule {
    /// Product attribute, e.g. `TAG`, `TITLE`, `VENDOR`.
    pub column: String,
    /// Comparison, e.g. `EQUALS`, `CONTAINS`.
    pub relation: String,
    /// Value to compare against.
    pub condition: String,
}

/// Rule set that turns a collection into a smart collection.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRuleSet {
    /// Match any rule instead of all rules.
    #[serde(default)]
    pub applied_disjunctively: bool,
    /// The rules.
    pub rules: Vec<CollectionRule>,
}

/// Fields of a new collection.
#[derive(Clone, Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInput {
    /// Collection title.
    pub title: String,
    /// Description, as HTML.
    #[serde(default)]
    pub description_html: Option<String>,
    /// URL handle.
    #[serde(default)]
    pub handle: Option<String>,
    /// Products to add to a custom collection.
    #[serde(default)]
    pub product_ids: Vec<String>,
    /// Rules for a smart collection.
    #[serde(default)]
    pub rule_set: Option<CollectionRuleSet>,
}

/// Fields to change on an existing collection.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, as HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// New URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// Product count of a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Count {
    pub count: i64,
}

/// A collection read or written through GraphQL.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub products_count: Option<Count>,
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

/// What [`manage_webhook`](crate::admin::ShopifyClient::manage_webhook) does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WebhookAction {
    /// Create a subscription.
    Subscribe,
    /// Look up the subscription for a callback and topic.
    Find,
    /// Delete a subscription by id.
    Unsubscribe,
}

/// A webhook subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub id: String,
    pub topic: String,
    pub callback_url: Option<String>,
    pub format: Option<String>,
    pub created_at: Option<String>,
}

/// Outcome of a webhook action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookOutcome {
    pub action: WebhookAction,
    /// The created or found subscription.
    pub subscription: Option<WebhookSubscription>,
    /// The id removed by an unsubscribe.
    pub deleted_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Metafields
// ---------------------------------------------------------------------------

/// A metafield value to set.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    /// Namespace, e.g. `custom`.
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
    /// Serialized value.
    pub value: String,
    /// Metafield type, e.g. `single_line_text_field`.
    #[serde(rename = "type")]
    pub metafield_type: String,
}

/// A stored metafield.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metafield {
    pub id: String,
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub metafield_type: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_flattens_connections() {
        let product: Product = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "Shirt",
            "tags": null,
            "priceRangeV2": {
                "minVariantPrice": {"amount": "10.0", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "12.0", "currencyCode": "USD"}
            },
            "images": {"edges": [{"node": {"url": "https://cdn/x.png", "altText": null}}]},
            "variants": {"edges": [{"node": {"id": "gid://shopify/ProductVariant/2", "title": "S"}}]}
        }))
        .unwrap();

        assert!(product.tags.is_empty());
        assert_eq!(product.images[0].url, "https://cdn/x.png");
        assert_eq!(product.variants[0].title, "S");
        assert_eq!(
            product.price_range_v2.unwrap().min_variant_price.amount,
            "10.0"
        );
    }

    #[test]
    fn test_missing_connection_is_empty() {
        let order: Order = serde_json::from_value(json!({
            "id": "gid://shopify/Order/1",
            "name": "#1001",
            "lineItems": null
        }))
        .unwrap();
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn test_page_info_next_cursor() {
        let page = PageInfo {
            has_next_page: true,
            end_cursor: Some("c1".to_string()),
        };
        assert_eq!(page.next_cursor().as_deref(), Some("c1"));

        let last = PageInfo {
            has_next_page: false,
            end_cursor: Some("c2".to_string()),
        };
        assert_eq!(last.next_cursor(), None);
    }

    #[test]
    fn test_discount_input_defaults() {
        let input: BasicDiscountInput = serde_json::from_value(json!({
            "title": "Summer",
            "code": "SUMMER10",
            "valueType": "percentage",
            "value": 0.1,
            "startsAt": "2026-06-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(input.value_type, DiscountValueType::Percentage);
        assert!(input.applies_once_per_customer);
        assert_eq!(input.combines_with, CombinesWith::default());
        assert!(input.include_collection_ids.is_empty());
    }

    #[test]
    fn test_product_input_skips_absent_fields() {
        let input = ProductInput {
            title: "Mug".to_string(),
            description_html: None,
            vendor: Some("Acme".to_string()),
            product_type: None,
            tags: None,
            status: Some(ProductStatus::Draft),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"title": "Mug", "vendor": "Acme", "status": "DRAFT"})
        );
    }

    #[test]
    fn test_media_content_type_names() {
        assert_eq!(
            serde_json::to_value(MediaContentType::ExternalVideo).unwrap(),
            json!("EXTERNAL_VIDEO")
        );
        assert_eq!(
            serde_json::to_value(MediaContentType::Model3d).unwrap(),
            json!("MODEL_3D")
        );
    }
}
