//! Customer listing and tagging.

use serde_json::json;
use tracing::instrument;

use super::{graphql_context, take_at, CustomerSummary, CustomersPage, ShopifyClient, USER_ERRORS};
use crate::clients::{ErrorContext, HttpMethod, HttpRequest, ShopifyError};
use crate::gid::{GlobalId, ResourceType};

const CUSTOMER_FIELDS: &str = "id,email,tags";

const TAG_CUSTOMER: &str = r"
mutation TagCustomer($id: ID!, $tags: [String!]!) {
  tagsAdd(id: $id, tags: $tags) {
    node { id }
    userErrors { field message }
  }
}";

impl ShopifyClient {
    /// Loads a page of customers through the REST `customers.json` endpoint.
    ///
    /// `next` is the `page_info` cursor returned by the previous page. The
    /// returned page carries the cursor parsed from the `Link` header.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the request fails.
    #[instrument(skip(self))]
    pub async fn load_customers(
        &self,
        limit: u32,
        next: Option<&str>,
    ) -> Result<CustomersPage, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let request = self.build(
            HttpRequest::builder(HttpMethod::Get, "customers.json")
                .query_param("limit", limit.to_string())
                .query_param("fields", CUSTOMER_FIELDS)
                .query_param_opt("page_info", next),
        )?;
        let mut response = self.rest(domain.as_ref(), request).await?;

        let context = ErrorContext::with_params(json!({
            "limit": limit,
            "next": next,
        }));
        let customers: Vec<CustomerSummary> = self.decode(
            take_at(&mut response.body, "/customers"),
            "customers",
            &context,
        )?;
        Ok(CustomersPage {
            customers,
            next: response.next_page_info,
        })
    }

    /// Adds tags to a customer. Returns `true` once the tags are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the tags, or the
    /// resolution or transport error.
    #[instrument(skip(self))]
    pub async fn tag_customer(
        &self,
        customer_id: &str,
        tags: &[String],
    ) -> Result<bool, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "id": GlobalId::normalize(customer_id, ResourceType::Customer),
            "tags": tags,
        });
        let context = graphql_context(TAG_CUSTOMER, variables.clone());
        let mut data = self.graphql(&domain, TAG_CUSTOMER, variables).await?;
        let payload = self.mutation_payload(&mut data, "tagsAdd", USER_ERRORS, &context)?;
        Ok(payload.pointer("/node/id").is_some_and(|id| !id.is_null()))
    }
}
