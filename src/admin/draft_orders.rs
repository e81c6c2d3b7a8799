//! Draft order creation and completion.

use serde_json::{json, Value};
use tracing::instrument;

use super::{
    graphql_context, take_at, CompletedDraftOrder, DraftOrder, DraftOrderInput, ShopifyClient,
    USER_ERRORS,
};
use crate::clients::{ErrorContext, ShopifyError};
use crate::gid::{GlobalId, ResourceType};

const CREATE_DRAFT_ORDER: &str = r"
mutation CreateDraftOrder($input: DraftOrderInput!) {
  draftOrderCreate(input: $input) {
    draftOrder {
      id
      name
      status
      invoiceUrl
      totalPriceSet { shopMoney { amount currencyCode } }
    }
    userErrors { field message }
  }
}";

const COMPLETE_DRAFT_ORDER: &str = r"
mutation CompleteDraftOrder($id: ID!) {
  draftOrderComplete(id: $id) {
    draftOrder {
      id
      name
      order { id }
    }
    userErrors { field message }
  }
}";

impl ShopifyClient {
    /// Creates a draft order.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the input, or the
    /// resolution or transport error.
    #[instrument(skip(self, input), fields(line_items = input.line_items.len()))]
    pub async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrder, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let mut input = input.clone();
        for item in &mut input.line_items {
            item.variant_id =
                GlobalId::normalize(&item.variant_id, ResourceType::ProductVariant).into();
        }
        let variables = json!({ "input": self.encode(&input)? });
        let context = graphql_context(CREATE_DRAFT_ORDER, variables.clone());
        let mut data = self.graphql(&domain, CREATE_DRAFT_ORDER, variables).await?;
        let mut payload =
            self.mutation_payload(&mut data, "draftOrderCreate", USER_ERRORS, &context)?;
        self.decode(take_at(&mut payload, "/draftOrder"), "draft order", &context)
    }

    /// Completes a draft order after checking that `variant_id` can be sold.
    ///
    /// The variant is looked up first; the completion mutation is only sent
    /// when it exists and is available for sale.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::VariantNotFound`] or
    /// [`ShopifyError::VariantNotAvailableForSale`] from the pre-check,
    /// [`ShopifyError::User`] if completion is rejected, or the resolution or
    /// transport error.
    #[instrument(skip(self))]
    pub async fn complete_draft_order(
        &self,
        draft_order_id: &str,
        variant_id: &str,
    ) -> Result<CompletedDraftOrder, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variant_gid = GlobalId::normalize(variant_id, ResourceType::ProductVariant);
        let context = ErrorContext::with_params(json!({
            "draft_order_id": draft_order_id,
            "variant_id": variant_gid,
        }));

        let variants = self
            .variants_by_ids_on(&domain, &[variant_gid.to_string()])
            .await?;
        let Some(variant) = variants.first() else {
            return Err(self.fail(ShopifyError::VariantNotFound {
                variant_id: variant_gid.into_inner(),
                context,
            }));
        };
        if !variant.available_for_sale {
            return Err(self.fail(ShopifyError::VariantNotAvailableForSale {
                variant_id: variant_gid.into_inner(),
                context,
            }));
        }

        let variables = json!({
            "id": GlobalId::normalize(draft_order_id, ResourceType::DraftOrder),
        });
        let context = graphql_context(COMPLETE_DRAFT_ORDER, variables.clone());
        let mut data = self.graphql(&domain, COMPLETE_DRAFT_ORDER, variables).await?;
        let payload =
            self.mutation_payload(&mut data, "draftOrderComplete", USER_ERRORS, &context)?;

        let draft = payload.get("draftOrder").filter(|d| !d.is_null());
        let Some(draft) = draft else {
            return Err(self.fail(ShopifyError::unexpected_shape(
                "Completed draft order is missing",
                context,
            )));
        };
        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(String::from);

        Ok(CompletedDraftOrder {
            draft_order_id: text(draft.get("id")).unwrap_or_default(),
            draft_order_name: text(draft.get("name")).unwrap_or_default(),
            order_id: text(draft.pointer("/order/id")),
        })
    }
}
