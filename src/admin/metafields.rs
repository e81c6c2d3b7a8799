//! Metafields on any resource that has them.

use serde_json::json;
use tracing::instrument;

use super::types::Connection;
use super::{graphql_context, take_at, Metafield, MetafieldInput, ShopifyClient};
use crate::clients::{ErrorContext, ShopifyError};
use crate::gid::{GlobalId, ResourceType};

const SET_METAFIELDS: &str = r"
mutation SetMetafields($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields { id namespace key value type updatedAt }
    userErrors { field message code }
  }
}";

const LOAD_METAFIELDS: &str = r"
query LoadMetafields($id: ID!, $first: Int!, $namespace: String) {
  node(id: $id) {
    id
    ... on HasMetafields {
      metafields(first: $first, namespace: $namespace) {
        edges { node { id namespace key value type updatedAt } }
      }
    }
  }
}";

/// Resolves the owner global id from an explicit type or the id itself.
///
/// A bare id without an explicit type is rejected.
fn owner_gid(owner_id: &str, owner_type: Option<ResourceType>) -> Result<GlobalId, String> {
    if let Some(resource_type) = owner_type {
        return Ok(GlobalId::normalize(owner_id, resource_type));
    }
    GlobalId::parse(owner_id).ok_or_else(|| {
        format!("owner type is required for bare id '{}'", owner_id.trim())
    })
}

impl ShopifyClient {
    fn metafield_owner(
        &self,
        owner_id: &str,
        owner_type: Option<ResourceType>,
    ) -> Result<GlobalId, ShopifyError> {
        owner_gid(owner_id, owner_type).map_err(|message| {
            self.fail(ShopifyError::input(
                message,
                ErrorContext::with_params(json!({
                    "owner_id": owner_id,
                    "owner_type": owner_type.map(ResourceType::as_str),
                })),
            ))
        })
    }

    /// Sets metafields on one owner resource.
    ///
    /// `owner_type` may be omitted when `owner_id` is already a global id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] if the owner type cannot be determined
    /// (no request is made), [`ShopifyError::User`] if the API rejects a
    /// value, or the resolution or transport error.
    #[instrument(skip(self, metafields), fields(count = metafields.len()))]
    pub async fn set_metafields(
        &self,
        owner_id: &str,
        owner_type: Option<ResourceType>,
        metafields: &[MetafieldInput],
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let owner = self.metafield_owner(owner_id, owner_type)?;
        let domain = self.canonical_domain().await?;

        let inputs: Vec<_> = metafields
            .iter()
            .map(|metafield| {
                json!({
                    "ownerId": owner,
                    "namespace": metafield.namespace,
                    "key": metafield.key,
                    "value": metafield.value,
                    "type": metafield.metafield_type,
                })
            })
            .collect();
        let variables = json!({ "metafields": inputs });
        let context = graphql_context(SET_METAFIELDS, variables.clone());
        let mut data = self.graphql(&domain, SET_METAFIELDS, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "metafieldsSet",
            super::USER_ERRORS,
            &context,
        )?;
        let stored = take_at(&mut payload, "/metafields");
        if stored.is_null() {
            return Ok(Vec::new());
        }
        self.decode(stored, "metafields", &context)
    }

    /// Loads the metafields of one owner resource.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] if the owner type cannot be determined
    /// or the owner does not exist, or the resolution or query error.
    #[instrument(skip(self))]
    pub async fn load_metafields(
        &self,
        owner_id: &str,
        owner_type: Option<ResourceType>,
        namespace: Option<&str>,
        first: u32,
    ) -> Result<Vec<Metafield>, ShopifyError> {
        let owner = self.metafield_owner(owner_id, owner_type)?;
        let domain = self.canonical_domain().await?;

        let variables = json!({ "id": owner, "first": first, "namespace": namespace });
        let context = graphql_context(LOAD_METAFIELDS, variables.clone());
        let mut data = self.graphql(&domain, LOAD_METAFIELDS, variables).await?;

        if data.get("node").is_none_or(serde_json::Value::is_null) {
            return Err(self.fail(ShopifyError::input(
                format!("Metafield owner {owner} not found"),
                context,
            )));
        }
        let metafields = take_at(&mut data, "/node/metafields");
        if metafields.is_null() {
            return Ok(Vec::new());
        }
        let connection: Connection<Metafield> =
            self.decode(metafields, "metafields", &context)?;
        Ok(connection.into_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gid_prefers_explicit_type() {
        let owner = owner_gid("42", Some(ResourceType::Product)).unwrap();
        assert_eq!(owner.as_str(), "gid://shopify/Product/42");
    }

    #[test]
    fn test_owner_gid_uses_embedded_type() {
        let owner = owner_gid("gid://shopify/Customer/7", None).unwrap();
        assert_eq!(owner.as_str(), "gid://shopify/Customer/7");
        assert_eq!(owner.resource_type(), Some("Customer"));
    }

    #[test]
    fn test_owner_gid_rejects_bare_id_without_type() {
        let error = owner_gid("42", None).unwrap_err();
        assert!(error.contains("owner type is required"));
    }
}
