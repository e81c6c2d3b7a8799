//! Collection listing and collection mutations.
//!
//! Listing goes through the REST `custom_collections.json` and
//! `smart_collections.json` endpoints, merged into one page. The page cursor
//! is the two sub-cursors joined with a comma, `<custom>,<smart>`, where the
//! literal `undefined` marks a kind that has no further pages:
//!
//! ```text
//! eyJsYXN0X2lkIjo0ODI4NjU...,undefined
//! ```

use std::fmt;

use serde_json::{json, Map, Value};
use tracing::instrument;

use super::{
    graphql_context, take_at, CollectionInput, CollectionKind, CollectionRecord,
    CollectionSummary, CollectionUpdate, CollectionsPage, LoadCollectionsParams, ShopifyClient,
    USER_ERRORS,
};
use crate::clients::{ErrorContext, HttpMethod, HttpRequest, ShopifyError};
use crate::config::CanonicalDomain;
use crate::gid::{GlobalId, ResourceType};

const EXHAUSTED: &str = "undefined";

const COLLECTION_FIELDS: &str = r"
fragment CollectionFields on Collection {
  id
  title
  handle
  descriptionHtml
  updatedAt
  productsCount { count }
}";

const CREATE_COLLECTION: &str = r"
mutation CreateCollection($input: CollectionInput!) {
  collectionCreate(input: $input) {
    collection { ...CollectionFields }
    userErrors { field message }
  }
}";

const UPDATE_COLLECTION: &str = r"
mutation UpdateCollection($input: CollectionInput!) {
  collectionUpdate(input: $input) {
    collection { ...CollectionFields }
    userErrors { field message }
  }
}";

const ADD_PRODUCTS: &str = r"
mutation AddProductsToCollection($id: ID!, $productIds: [ID!]!) {
  collectionAddProducts(id: $id, productIds: $productIds) {
    collection { ...CollectionFields }
    userErrors { field message }
  }
}";

const REMOVE_PRODUCTS: &str = r"
mutation RemoveProductsFromCollection($id: ID!, $productIds: [ID!]!) {
  collectionRemoveProducts(id: $id, productIds: $productIds) {
    job { id done }
    userErrors { field message }
  }
}";

const DELETE_COLLECTION: &str = r"
mutation DeleteCollection($input: CollectionDeleteInput!) {
  collectionDelete(input: $input) {
    deletedCollectionId
    userErrors { field message }
  }
}";

/// Position of one collection kind within the composite cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SubCursor {
    /// First page: the listing filters apply.
    Start,
    /// Continue from this `page_info` token.
    Page(String),
    /// No further pages.
    Exhausted,
}

impl SubCursor {
    fn parse(half: &str) -> Self {
        match half.trim() {
            "" => Self::Start,
            EXHAUSTED => Self::Exhausted,
            token => Self::Page(token.to_string()),
        }
    }
}

/// Incoming page position for both collection kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CompositeCursor {
    custom: SubCursor,
    smart: SubCursor,
}

impl CompositeCursor {
    fn parse(next: Option<&str>) -> Result<Self, String> {
        let Some(next) = next else {
            return Ok(Self {
                custom: SubCursor::Start,
                smart: SubCursor::Start,
            });
        };
        match next.split(',').collect::<Vec<_>>().as_slice() {
            [custom, smart] => Ok(Self {
                custom: SubCursor::parse(custom),
                smart: SubCursor::parse(smart),
            }),
            _ => Err(format!("Invalid collections cursor '{next}'")),
        }
    }
}

/// Joins the two outgoing sub-cursors, or `None` when both kinds are done.
fn join_cursors(custom: Option<&str>, smart: Option<&str>) -> Option<String> {
    if custom.is_none() && smart.is_none() {
        return None;
    }
    Some(format!(
        "{},{}",
        custom.unwrap_or(EXHAUSTED),
        smart.unwrap_or(EXHAUSTED)
    ))
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom => f.write_str("custom"),
            Self::Smart => f.write_str("smart"),
        }
    }
}

impl CollectionKind {
    const fn endpoint(self) -> &'static str {
        match self {
            Self::Custom => "custom_collections.json",
            Self::Smart => "smart_collections.json",
        }
    }

    const fn body_key(self) -> &'static str {
        match self {
            Self::Custom => "/custom_collections",
            Self::Smart => "/smart_collections",
        }
    }
}

fn collection_input(input: &CollectionInput) -> Value {
    let mut fields = Map::new();
    fields.insert("title".to_string(), json!(input.title));
    if let Some(description) = &input.description_html {
        fields.insert("descriptionHtml".to_string(), json!(description));
    }
    if let Some(handle) = &input.handle {
        fields.insert("handle".to_string(), json!(handle));
    }
    if !input.product_ids.is_empty() {
        fields.insert("products".to_string(), json!(product_gids(&input.product_ids)));
    }
    if let Some(rule_set) = &input.rule_set {
        fields.insert("ruleSet".to_string(), json!(rule_set));
    }
    Value::Object(fields)
}

fn product_gids(ids: &[String]) -> Vec<GlobalId> {
    ids.iter()
        .map(|id| GlobalId::normalize(id, ResourceType::Product))
        .collect()
}

impl ShopifyClient {
    /// Loads one merged page of custom and smart collections.
    ///
    /// `next` is the composite cursor from the previous page. A kind whose
    /// half is `undefined` is not requested again. When a half carries a
    /// token only `page_info` and `limit` are sent, since REST rejects
    /// filters alongside `page_info`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] for a malformed cursor, or the
    /// resolution or request error.
    #[instrument(skip(self))]
    pub async fn load_collections(
        &self,
        params: &LoadCollectionsParams,
        next: Option<&str>,
    ) -> Result<CollectionsPage, ShopifyError> {
        let cursor = CompositeCursor::parse(next).map_err(|message| {
            self.fail(ShopifyError::input(
                message,
                ErrorContext::with_params(json!({ "next": next })),
            ))
        })?;
        let domain = self.canonical_domain().await?;

        let (custom, custom_next) = self
            .collections_of_kind(&domain, CollectionKind::Custom, &cursor.custom, params)
            .await?;
        let (smart, smart_next) = self
            .collections_of_kind(&domain, CollectionKind::Smart, &cursor.smart, params)
            .await?;

        let mut collections = custom;
        collections.extend(smart);
        Ok(CollectionsPage {
            collections,
            next: join_cursors(custom_next.as_deref(), smart_next.as_deref()),
        })
    }

    async fn collections_of_kind(
        &self,
        domain: &CanonicalDomain,
        kind: CollectionKind,
        cursor: &SubCursor,
        params: &LoadCollectionsParams,
    ) -> Result<(Vec<CollectionSummary>, Option<String>), ShopifyError> {
        let builder = HttpRequest::builder(HttpMethod::Get, kind.endpoint())
            .query_param("limit", params.limit.to_string());
        let builder = match cursor {
            SubCursor::Exhausted => return Ok((Vec::new(), None)),
            SubCursor::Page(token) => builder.query_param("page_info", token.as_str()),
            SubCursor::Start => builder
                .query_param_opt("title", params.name.as_deref())
                .query_param_opt("since_id", params.since_id),
        };

        let request = self.build(builder)?;
        let mut response = self.rest(domain.as_ref(), request).await?;
        let context = ErrorContext::with_params(json!({ "kind": kind.to_string() }));
        let mut collections: Vec<CollectionSummary> =
            self.decode(take_at(&mut response.body, kind.body_key()), "collections", &context)?;
        for collection in &mut collections {
            collection.kind = kind;
        }
        Ok((collections, response.next_page_info))
    }

    /// Creates a collection. A rule set makes it a smart collection.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the input, or the
    /// resolution or transport error.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_collection(
        &self,
        input: &CollectionInput,
    ) -> Result<CollectionRecord, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({ "input": collection_input(input) });
        self.collection_mutation(&domain, CREATE_COLLECTION, "collectionCreate", variables)
            .await
    }

    /// Updates title, description, or handle of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the input, or the
    /// resolution or transport error.
    #[instrument(skip(self, update))]
    pub async fn update_collection(
        &self,
        collection_id: &str,
        update: &CollectionUpdate,
    ) -> Result<CollectionRecord, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let mut input = self.encode(update)?;
        input["id"] = json!(GlobalId::normalize(collection_id, ResourceType::Collection));
        let variables = json!({ "input": input });
        self.collection_mutation(&domain, UPDATE_COLLECTION, "collectionUpdate", variables)
            .await
    }

    /// Adds products to a custom collection.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the change, or the
    /// resolution or transport error.
    #[instrument(skip(self))]
    pub async fn add_products_to_collection(
        &self,
        collection_id: &str,
        product_ids: &[String],
    ) -> Result<CollectionRecord, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "id": GlobalId::normalize(collection_id, ResourceType::Collection),
            "productIds": product_gids(product_ids),
        });
        self.collection_mutation(&domain, ADD_PRODUCTS, "collectionAddProducts", variables)
            .await
    }

    /// Removes products from a custom collection.
    ///
    /// Removal runs as a background job on the remote side; the job id is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the change, or the
    /// resolution or transport error.
    #[instrument(skip(self))]
    pub async fn remove_products_from_collection(
        &self,
        collection_id: &str,
        product_ids: &[String],
    ) -> Result<String, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "id": GlobalId::normalize(collection_id, ResourceType::Collection),
            "productIds": product_gids(product_ids),
        });
        let context = graphql_context(REMOVE_PRODUCTS, variables.clone());
        let mut data = self.graphql(&domain, REMOVE_PRODUCTS, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "collectionRemoveProducts",
            USER_ERRORS,
            &context,
        )?;
        self.decode(take_at(&mut payload, "/job/id"), "job id", &context)
    }

    /// Deletes a collection, returning the deleted id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the collection cannot be deleted, or
    /// the resolution or transport error.
    #[instrument(skip(self))]
    pub async fn delete_collection(&self, collection_id: &str) -> Result<String, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "input": { "id": GlobalId::normalize(collection_id, ResourceType::Collection) },
        });
        let context = graphql_context(DELETE_COLLECTION, variables.clone());
        let mut data = self.graphql(&domain, DELETE_COLLECTION, variables).await?;
        let mut payload =
            self.mutation_payload(&mut data, "collectionDelete", USER_ERRORS, &context)?;
        self.decode(
            take_at(&mut payload, "/deletedCollectionId"),
            "deleted collection id",
            &context,
        )
    }

    async fn collection_mutation(
        &self,
        domain: &CanonicalDomain,
        mutation: &str,
        field: &str,
        variables: Value,
    ) -> Result<CollectionRecord, ShopifyError> {
        let query = format!("{mutation}\n{COLLECTION_FIELDS}");
        let context = graphql_context(&query, variables.clone());
        let mut data = self.graphql(domain, &query, variables).await?;
        let mut payload = self.mutation_payload(&mut data, field, USER_ERRORS, &context)?;
        let collection = take_at(&mut payload, "/collection");
        if collection.is_null() {
            return Err(self.fail(ShopifyError::unexpected_shape(
                format!("Collection is missing from '{field}' payload"),
                context,
            )));
        }
        self.decode(collection, "collection", &context)
    }
}
