//! Order listing and lookup.

use serde_json::{json, Value};
use tracing::instrument;

use super::types::Connection;
use super::{graphql_context, take_at, LoadOrdersParams, Order, OrdersPage, ShopifyClient};
use crate::clients::{ErrorContext, HttpMethod, HttpRequest, ShopifyError};
use crate::gid::ResourceType;

const LOAD_ORDERS: &str = r"
query LoadOrders($first: Int!, $after: String, $query: String, $sortKey: OrderSortKeys, $reverse: Boolean) {
  orders(first: $first, after: $after, query: $query, sortKey: $sortKey, reverse: $reverse) {
    edges {
      node {
        id
        name
        createdAt
        displayFinancialStatus
        displayFulfillmentStatus
        email
        totalPriceSet { shopMoney { amount currencyCode } }
        subtotalPriceSet { shopMoney { amount currencyCode } }
        totalShippingPriceSet { shopMoney { amount currencyCode } }
        totalTaxSet { shopMoney { amount currencyCode } }
        customer { id email firstName lastName }
        shippingAddress { address1 address2 city provinceCode zip countryCodeV2 }
        lineItems(first: 10) {
          edges {
            node {
              id
              title
              quantity
              originalTotalSet { shopMoney { amount currencyCode } }
              variant { id title sku }
            }
          }
        }
        tags
        note
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

impl ShopifyClient {
    /// Loads a page of orders.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self))]
    pub async fn load_orders(&self, params: &LoadOrdersParams) -> Result<OrdersPage, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = self.encode(params)?;
        let context = graphql_context(LOAD_ORDERS, variables.clone());
        let mut data = self.graphql(&domain, LOAD_ORDERS, variables).await?;

        let connection: Connection<Order> =
            self.decode(take_at(&mut data, "/orders"), "orders", &context)?;
        let next = connection.page_info.clone().next_cursor();
        Ok(OrdersPage {
            orders: connection.into_nodes(),
            next,
        })
    }

    /// Loads one order through the REST `orders/<id>.json` endpoint.
    ///
    /// Accepts a bare numeric id or an order global id. The REST order
    /// object is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] if the id has no numeric part, or the
    /// resolution or request error.
    #[instrument(skip(self))]
    pub async fn load_order(&self, order_id: &str) -> Result<Value, ShopifyError> {
        let numeric = self.rest_id(order_id, ResourceType::Order)?;
        let domain = self.canonical_domain().await?;
        let context = ErrorContext::with_params(json!({ "order_id": order_id }));

        let request = self.build(HttpRequest::builder(
            HttpMethod::Get,
            format!("orders/{numeric}.json"),
        ))?;
        let mut response = self.rest(domain.as_ref(), request).await?;
        let order = take_at(&mut response.body, "/order");
        if order.is_null() {
            return Err(self.fail(ShopifyError::unexpected_shape(
                "Order response has no order object",
                context,
            )));
        }
        Ok(order)
    }
}
