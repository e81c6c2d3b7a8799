//! Product, variant, and media operations.

use serde_json::{json, Value};
use tracing::instrument;

use super::types::Connection;
use super::{
    graphql_context, present_nodes, take_at, Media, MediaInput, Product, ProductInput,
    ProductUpdate, ProductVariant, ProductsPage, ShopifyClient, VariantInput, VariantUpdate,
    VariantWithProduct, USER_ERRORS,
};
use crate::clients::ShopifyError;
use crate::config::CanonicalDomain;
use crate::gid::{GlobalId, ResourceType};

macro_rules! product_fragments {
    () => {
        r"
fragment VariantFields on ProductVariant {
  id
  title
  price
  compareAtPrice
  sku
  inventoryQuantity
  availableForSale
  selectedOptions { name value }
}

fragment ProductFields on Product {
  id
  title
  description
  handle
  status
  vendor
  productType
  tags
  createdAt
  updatedAt
  totalInventory
  priceRangeV2 {
    minVariantPrice { amount currencyCode }
    maxVariantPrice { amount currencyCode }
  }
  images(first: 1) { edges { node { url altText } } }
  variants(first: 5) { edges { node { ...VariantFields } } }
}"
    };
}

const LOAD_PRODUCTS: &str = concat!(
    r"
query LoadProducts($first: Int!, $query: String, $after: String) {
  products(first: $first, query: $query, after: $after) {
    edges { node { ...ProductFields } }
    pageInfo { hasNextPage endCursor }
  }
  shop { currencyCode }
}",
    product_fragments!()
);

const LOAD_PRODUCTS_BY_COLLECTION: &str = concat!(
    r"
query LoadProductsByCollection($id: ID!, $first: Int!, $after: String) {
  collection(id: $id) {
    products(first: $first, after: $after) {
      edges { node { ...ProductFields } }
      pageInfo { hasNextPage endCursor }
    }
  }
  shop { currencyCode }
}",
    product_fragments!()
);

const LOAD_PRODUCTS_BY_IDS: &str = concat!(
    r"
query LoadProductsByIds($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Product { ...ProductFields }
  }
}",
    product_fragments!()
);

const LOAD_VARIANTS_BY_IDS: &str = r"
query LoadVariantsByIds($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on ProductVariant {
      id
      title
      price
      sku
      availableForSale
      inventoryQuantity
      product { id title }
    }
  }
}";

const CREATE_PRODUCT: &str = concat!(
    r"
mutation CreateProduct($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product { ...ProductFields }
    userErrors { field message }
  }
}",
    product_fragments!()
);

const UPDATE_PRODUCT: &str = concat!(
    r"
mutation UpdateProduct($product: ProductUpdateInput!) {
  productUpdate(product: $product) {
    product { ...ProductFields }
    userErrors { field message }
  }
}",
    product_fragments!()
);

const DELETE_PRODUCT: &str = r"
mutation DeleteProduct($input: ProductDeleteInput!) {
  productDelete(input: $input) {
    deletedProductId
    userErrors { field message }
  }
}";

const CREATE_PRODUCT_VARIANTS: &str = r"
mutation CreateProductVariants($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkCreate(productId: $productId, variants: $variants) {
    productVariants {
      id title price compareAtPrice sku inventoryQuantity availableForSale
      selectedOptions { name value }
    }
    userErrors { field message code }
  }
}";

const UPDATE_PRODUCT_VARIANTS: &str = r"
mutation UpdateProductVariants($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants {
      id title price compareAtPrice sku inventoryQuantity availableForSale
      selectedOptions { name value }
    }
    userErrors { field message code }
  }
}";

const CREATE_PRODUCT_MEDIA: &str = r"
mutation CreateProductMedia($productId: ID!, $media: [CreateMediaInput!]!) {
  productCreateMedia(productId: $productId, media: $media) {
    media { id alt mediaContentType status }
    mediaUserErrors { field message code }
  }
}";

impl ShopifyClient {
    /// Loads a page of products, optionally filtered by a title substring.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self))]
    pub async fn load_products(
        &self,
        search_title: Option<&str>,
        limit: u32,
        after: Option<&str>,
    ) -> Result<ProductsPage, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "first": limit,
            "query": search_title.map(|title| format!("title:*{title}*")),
            "after": after,
        });
        let context = graphql_context(LOAD_PRODUCTS, variables.clone());
        let mut data = self.graphql(&domain, LOAD_PRODUCTS, variables).await?;

        let connection: Connection<Product> =
            self.decode(take_at(&mut data, "/products"), "products", &context)?;
        Ok(products_page(connection, &data))
    }

    /// Loads a page of the products in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] if the collection does not exist, or
    /// the resolution or query error.
    #[instrument(skip(self))]
    pub async fn load_products_by_collection_id(
        &self,
        collection_id: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<ProductsPage, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let id = GlobalId::normalize(collection_id, ResourceType::Collection);
        let variables = json!({ "id": id, "first": limit, "after": after });
        let context = graphql_context(LOAD_PRODUCTS_BY_COLLECTION, variables.clone());
        let mut data = self
            .graphql(&domain, LOAD_PRODUCTS_BY_COLLECTION, variables)
            .await?;

        if data.get("collection").is_none_or(Value::is_null) {
            return Err(self.fail(ShopifyError::input(
                format!("Collection {id} not found"),
                context,
            )));
        }
        let connection: Connection<Product> = self.decode(
            take_at(&mut data, "/collection/products"),
            "collection products",
            &context,
        )?;
        Ok(products_page(connection, &data))
    }

    /// Loads products by id. Ids that do not resolve to a product are skipped,
    /// and an empty list returns without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self))]
    pub async fn load_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, ShopifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let domain = self.canonical_domain().await?;
        let ids: Vec<GlobalId> = ids
            .iter()
            .map(|id| GlobalId::normalize(id, ResourceType::Product))
            .collect();
        let variables = json!({ "ids": ids });
        let context = graphql_context(LOAD_PRODUCTS_BY_IDS, variables.clone());
        let mut data = self.graphql(&domain, LOAD_PRODUCTS_BY_IDS, variables).await?;

        present_nodes(take_at(&mut data, "/nodes"))
            .into_iter()
            .map(|node| self.decode(node, "product", &context))
            .collect()
    }

    /// Loads variants, with their parent product, by id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self))]
    pub async fn load_variants_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<VariantWithProduct>, ShopifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let domain = self.canonical_domain().await?;
        self.variants_by_ids_on(&domain, ids).await
    }

    pub(crate) async fn variants_by_ids_on(
        &self,
        domain: &CanonicalDomain,
        ids: &[String],
    ) -> Result<Vec<VariantWithProduct>, ShopifyError> {
        let ids: Vec<GlobalId> = ids
            .iter()
            .map(|id| GlobalId::normalize(id, ResourceType::ProductVariant))
            .collect();
        let variables = json!({ "ids": ids });
        let context = graphql_context(LOAD_VARIANTS_BY_IDS, variables.clone());
        let mut data = self.graphql(domain, LOAD_VARIANTS_BY_IDS, variables).await?;

        present_nodes(take_at(&mut data, "/nodes"))
            .into_iter()
            .map(|node| self.decode(node, "variant", &context))
            .collect()
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the input, or the
    /// resolution or transport error.
    #[instrument(skip(self), fields(title = %input.title))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({ "product": self.encode(input)? });
        self.product_mutation(&domain, CREATE_PRODUCT, "productCreate", variables)
            .await
    }

    /// Updates the given fields of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the input, or the
    /// resolution or transport error.
    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        product_id: &str,
        update: &ProductUpdate,
    ) -> Result<Product, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let mut product = self.encode(update)?;
        product["id"] = json!(GlobalId::normalize(product_id, ResourceType::Product));
        let variables = json!({ "product": product });
        self.product_mutation(&domain, UPDATE_PRODUCT, "productUpdate", variables)
            .await
    }

    async fn product_mutation(
        &self,
        domain: &CanonicalDomain,
        query: &str,
        field: &str,
        variables: Value,
    ) -> Result<Product, ShopifyError> {
        let context = graphql_context(query, variables.clone());
        let mut data = self.graphql(domain, query, variables).await?;
        let mut payload = self.mutation_payload(&mut data, field, USER_ERRORS, &context)?;
        self.decode(take_at(&mut payload, "/product"), "product", &context)
    }

    /// Deletes a product, returning the deleted id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the product cannot be deleted, or
    /// the resolution or transport error.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: &str) -> Result<String, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let id = GlobalId::normalize(product_id, ResourceType::Product);
        let variables = json!({ "input": { "id": id } });
        let context = graphql_context(DELETE_PRODUCT, variables.clone());
        let mut data = self.graphql(&domain, DELETE_PRODUCT, variables).await?;
        let mut payload =
            self.mutation_payload(&mut data, "productDelete", USER_ERRORS, &context)?;
        self.decode(take_at(&mut payload, "/deletedProductId"), "deleted product id", &context)
    }

    /// Adds variants to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects a variant, or the
    /// resolution or transport error.
    #[instrument(skip(self, variants), fields(count = variants.len()))]
    pub async fn create_product_variants(
        &self,
        product_id: &str,
        variants: &[VariantInput],
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "productId": GlobalId::normalize(product_id, ResourceType::Product),
            "variants": self.encode(&variants)?,
        });
        self.variants_mutation(
            &domain,
            CREATE_PRODUCT_VARIANTS,
            "productVariantsBulkCreate",
            variables,
        )
        .await
    }

    /// Updates variants of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects a variant, or the
    /// resolution or transport error.
    #[instrument(skip(self, variants), fields(count = variants.len()))]
    pub async fn update_product_variants(
        &self,
        product_id: &str,
        variants: &[VariantUpdate],
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variants: Vec<VariantUpdate> = variants
            .iter()
            .cloned()
            .map(|mut variant| {
                variant.id = GlobalId::normalize(&variant.id, ResourceType::ProductVariant).into();
                variant
            })
            .collect();
        let variables = json!({
            "productId": GlobalId::normalize(product_id, ResourceType::Product),
            "variants": self.encode(&variants)?,
        });
        self.variants_mutation(
            &domain,
            UPDATE_PRODUCT_VARIANTS,
            "productVariantsBulkUpdate",
            variables,
        )
        .await
    }

    async fn variants_mutation(
        &self,
        domain: &CanonicalDomain,
        query: &str,
        field: &str,
        variables: Value,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let context = graphql_context(query, variables.clone());
        let mut data = self.graphql(domain, query, variables).await?;
        let mut payload = self.mutation_payload(&mut data, field, USER_ERRORS, &context)?;
        let variants = take_at(&mut payload, "/productVariants");
        if variants.is_null() {
            return Ok(Vec::new());
        }
        self.decode(variants, "product variants", &context)
    }

    /// Attaches media to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects a media item, or the
    /// resolution or transport error.
    #[instrument(skip(self, media), fields(count = media.len()))]
    pub async fn create_product_media(
        &self,
        product_id: &str,
        media: &[MediaInput],
    ) -> Result<Vec<Media>, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "productId": GlobalId::normalize(product_id, ResourceType::Product),
            "media": self.encode(&media)?,
        });
        let context = graphql_context(CREATE_PRODUCT_MEDIA, variables.clone());
        let mut data = self.graphql(&domain, CREATE_PRODUCT_MEDIA, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "productCreateMedia",
            "mediaUserErrors",
            &context,
        )?;
        let media = take_at(&mut payload, "/media");
        if media.is_null() {
            return Ok(Vec::new());
        }
        self.decode(media, "media", &context)
    }
}

fn products_page(connection: Connection<Product>, data: &Value) -> ProductsPage {
    let currency_code = data
        .pointer("/shop/currencyCode")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let next = connection.page_info.clone().next_cursor();
    ProductsPage {
        products: connection.into_nodes(),
        next,
        currency_code,
    }
}
