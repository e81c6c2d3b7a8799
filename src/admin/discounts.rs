//! Discount codes and price rules.
//!
//! Basic discount codes go through `discountCodeBasicCreate`. The mutation
//! input depends on the shop's subscription eligibility: eligible shops get
//! the subscription fields (`appliesOnOneTimePurchase`,
//! `appliesOnSubscription`, `recurringCycleLimit`), other shops get none of
//! them. The fields are left out entirely rather than sent as `false`.

use serde_json::{json, Map, Value};
use tracing::instrument;

use super::{
    graphql_context, take_at, BasicDiscountCode, BasicDiscountInput, DiscountCode,
    DiscountValueType, PriceRule, PriceRuleInput, ShopifyClient, USER_ERRORS,
};
use crate::clients::{ErrorContext, HttpMethod, HttpRequest, ShopifyError};
use crate::gid::{GlobalId, ResourceType};

const PRICE_RULE_USER_ERRORS: &str = "priceRuleUserErrors";

const CREATE_BASIC_DISCOUNT: &str = r"
mutation discountCodeBasicCreate($basicCodeDiscount: DiscountCodeBasicInput!) {
  discountCodeBasicCreate(basicCodeDiscount: $basicCodeDiscount) {
    codeDiscountNode {
      id
      codeDiscount {
        ... on DiscountCodeBasic {
          title
          codes(first: 10) { nodes { code } }
        }
      }
    }
    userErrors { field code message }
  }
}";

const DELETE_BASIC_DISCOUNT: &str = r"
mutation discountCodeDelete($id: ID!) {
  discountCodeDelete(id: $id) {
    deletedCodeDiscountId
    userErrors { field code message }
  }
}";

const CREATE_PRICE_RULE: &str = r"
mutation priceRuleCreate($priceRule: PriceRuleInput!) {
  priceRuleCreate(priceRule: $priceRule) {
    priceRule { id title status }
    priceRuleUserErrors { field code message }
  }
}";

const CREATE_DISCOUNT_CODE: &str = r"
mutation priceRuleDiscountCodeCreate($priceRuleId: ID!, $code: String!) {
  priceRuleDiscountCodeCreate(priceRuleId: $priceRuleId, code: $code) {
    priceRuleDiscountCode { id code }
    priceRuleUserErrors { field code message }
  }
}";

/// Checks a discount value against its type before anything is sent.
fn validate_value(value_type: DiscountValueType, value: f64) -> Result<(), String> {
    match value_type {
        DiscountValueType::Percentage if !(0.0..=1.0).contains(&value) => {
            Err("percentage discount value must be between 0 and 1".to_string())
        }
        DiscountValueType::FixedAmount if !value.is_finite() || value <= 0.0 => {
            Err("fixed amount discount value must be greater than 0".to_string())
        }
        _ => Ok(()),
    }
}

/// Builds the `basicCodeDiscount` mutation input.
fn basic_discount_input(input: &BasicDiscountInput, eligible: bool) -> Value {
    let value = match input.value_type {
        DiscountValueType::Percentage => json!({ "percentage": input.value }),
        DiscountValueType::FixedAmount => json!({
            "discountAmount": { "amount": input.value, "appliesOnEachItem": false }
        }),
    };

    let items = if input.include_collection_ids.is_empty() {
        json!({ "all": true })
    } else {
        let collections: Vec<GlobalId> = input
            .include_collection_ids
            .iter()
            .map(|id| GlobalId::normalize(id, ResourceType::Collection))
            .collect();
        json!({ "collections": { "add": collections } })
    };

    let mut customer_gets = Map::new();
    customer_gets.insert("value".to_string(), value);
    customer_gets.insert("items".to_string(), items);
    if eligible {
        customer_gets.insert("appliesOnOneTimePurchase".to_string(), json!(true));
        customer_gets.insert("appliesOnSubscription".to_string(), json!(true));
    }

    let mut discount = Map::new();
    discount.insert("title".to_string(), json!(input.title));
    discount.insert("code".to_string(), json!(input.code));
    discount.insert("startsAt".to_string(), json!(input.starts_at));
    discount.insert("endsAt".to_string(), json!(input.ends_at));
    discount.insert("customerSelection".to_string(), json!({ "all": true }));
    discount.insert("customerGets".to_string(), Value::Object(customer_gets));
    discount.insert(
        "appliesOncePerCustomer".to_string(),
        json!(input.applies_once_per_customer),
    );
    discount.insert(
        "combinesWith".to_string(),
        json!({
            "productDiscounts": input.combines_with.product_discounts,
            "orderDiscounts": input.combines_with.order_discounts,
            "shippingDiscounts": input.combines_with.shipping_discounts,
        }),
    );
    if eligible {
        discount.insert("recurringCycleLimit".to_string(), json!(1));
    }
    discount.insert("usageLimit".to_string(), json!(input.usage_limit));

    Value::Object(discount)
}

fn price_rule_input(input: &PriceRuleInput) -> Value {
    let value = match input.value_type {
        DiscountValueType::Percentage => json!({ "percentageValue": input.value }),
        DiscountValueType::FixedAmount => json!({ "fixedAmountValue": input.value }),
    };

    json!({
        "title": input.title,
        "target": input.target,
        "allocationMethod": input.allocation_method,
        "value": value,
        "validityPeriod": { "start": input.starts_at, "end": input.ends_at },
        "usageLimit": input.usage_limit,
        "oncePerCustomer": input.once_per_customer,
        "customerSelection": { "forAllCustomers": true },
        "itemEntitlements": { "targetAllLineItems": true },
    })
}

impl ShopifyClient {
    /// Creates a basic discount code.
    ///
    /// The value is checked locally first. Then the domain is resolved, the
    /// shop's subscription eligibility is read, and the mutation is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] for an out-of-range value (no request
    /// is made), [`ShopifyError::User`] if the API rejects the discount, or
    /// the resolution or transport error.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_basic_discount_code(
        &self,
        input: &BasicDiscountInput,
    ) -> Result<BasicDiscountCode, ShopifyError> {
        if let Err(message) = validate_value(input.value_type, input.value) {
            return Err(self.fail(ShopifyError::input(
                message,
                ErrorContext::with_params(json!({
                    "value_type": input.value_type,
                    "value": input.value,
                })),
            )));
        }

        let domain = self.canonical_domain().await?;
        let eligible = self.subscription_eligibility_on(&domain).await?;

        let variables = json!({ "basicCodeDiscount": basic_discount_input(input, eligible) });
        let context = graphql_context(CREATE_BASIC_DISCOUNT, variables.clone());
        let mut data = self.graphql(&domain, CREATE_BASIC_DISCOUNT, variables).await?;
        let payload =
            self.mutation_payload(&mut data, "discountCodeBasicCreate", USER_ERRORS, &context)?;

        let id = payload
            .pointer("/codeDiscountNode/id")
            .and_then(Value::as_str);
        let code = payload
            .pointer("/codeDiscountNode/codeDiscount/codes/nodes/0/code")
            .and_then(Value::as_str);
        match (id, code) {
            (Some(id), Some(code)) => Ok(BasicDiscountCode {
                id: id.to_string(),
                code: code.to_string(),
            }),
            _ => Err(self.fail(ShopifyError::unexpected_shape(
                "Created discount has no id or code",
                context,
            ))),
        }
    }

    /// Deletes a code discount, returning the deleted id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the discount cannot be deleted, or
    /// the resolution or transport error.
    #[instrument(skip(self))]
    pub async fn delete_basic_discount_code(
        &self,
        discount_id: &str,
    ) -> Result<String, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "id": GlobalId::normalize(discount_id, ResourceType::DiscountCodeNode),
        });
        let context = graphql_context(DELETE_BASIC_DISCOUNT, variables.clone());
        let mut data = self.graphql(&domain, DELETE_BASIC_DISCOUNT, variables).await?;
        let mut payload =
            self.mutation_payload(&mut data, "discountCodeDelete", USER_ERRORS, &context)?;
        self.decode(
            take_at(&mut payload, "/deletedCodeDiscountId"),
            "deleted discount id",
            &context,
        )
    }

    /// Creates a price rule that applies to all customers and line items.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the rule, or the
    /// resolution or transport error.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_price_rule(&self, input: &PriceRuleInput) -> Result<PriceRule, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({ "priceRule": price_rule_input(input) });
        let context = graphql_context(CREATE_PRICE_RULE, variables.clone());
        let mut data = self.graphql(&domain, CREATE_PRICE_RULE, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "priceRuleCreate",
            PRICE_RULE_USER_ERRORS,
            &context,
        )?;
        self.decode(take_at(&mut payload, "/priceRule"), "price rule", &context)
    }

    /// Creates a discount code under a price rule.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::User`] if the API rejects the code, or the
    /// resolution or transport error.
    #[instrument(skip(self))]
    pub async fn create_discount_code(
        &self,
        price_rule_id: &str,
        code: &str,
    ) -> Result<DiscountCode, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let variables = json!({
            "priceRuleId": GlobalId::normalize(price_rule_id, ResourceType::PriceRule),
            "code": code,
        });
        let context = graphql_context(CREATE_DISCOUNT_CODE, variables.clone());
        let mut data = self.graphql(&domain, CREATE_DISCOUNT_CODE, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "priceRuleDiscountCodeCreate",
            PRICE_RULE_USER_ERRORS,
            &context,
        )?;
        self.decode(
            take_at(&mut payload, "/priceRuleDiscountCode"),
            "discount code",
            &context,
        )
    }

    /// Deletes a price rule through REST.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] for an id without a numeric part, or
    /// the resolution or request error.
    #[instrument(skip(self))]
    pub async fn delete_price_rule(&self, price_rule_id: &str) -> Result<(), ShopifyError> {
        let rule = self.rest_id(price_rule_id, ResourceType::PriceRule)?;
        let domain = self.canonical_domain().await?;
        let request = self.build(HttpRequest::builder(
            HttpMethod::Delete,
            format!("price_rules/{rule}.json"),
        ))?;
        self.rest(domain.as_ref(), request).await?;
        Ok(())
    }

    /// Deletes a discount code of a price rule through REST.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] for an id without a numeric part, or
    /// the resolution or request error.
    #[instrument(skip(self))]
    pub async fn delete_discount_code(
        &self,
        price_rule_id: &str,
        discount_code_id: &str,
    ) -> Result<(), ShopifyError> {
        let rule = self.rest_id(price_rule_id, ResourceType::PriceRule)?;
        let code = self.rest_id(discount_code_id, ResourceType::DiscountCodeNode)?;
        let domain = self.canonical_domain().await?;
        let request = self.build(HttpRequest::builder(
            HttpMethod::Delete,
            format!("price_rules/{rule}/discount_codes/{code}.json"),
        ))?;
        self.rest(domain.as_ref(), request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::CombinesWith;

    fn input(value_type: DiscountValueType, value: f64) -> BasicDiscountInput {
        BasicDiscountInput {
            title: "Summer".to_string(),
            code: "SUMMER".to_string(),
            value_type,
            value,
            starts_at: "2026-06-01T00:00:00Z".parse().unwrap(),
            ends_at: None,
            usage_limit: Some(100),
            applies_once_per_customer: true,
            include_collection_ids: Vec::new(),
            combines_with: CombinesWith::default(),
        }
    }

    #[test]
    fn test_validate_value_bounds() {
        assert!(validate_value(DiscountValueType::Percentage, 0.0).is_ok());
        assert!(validate_value(DiscountValueType::Percentage, 1.0).is_ok());
        assert!(validate_value(DiscountValueType::Percentage, 1.01).is_err());
        assert!(validate_value(DiscountValueType::Percentage, -0.1).is_err());
        assert!(validate_value(DiscountValueType::Percentage, f64::NAN).is_err());
        assert!(validate_value(DiscountValueType::FixedAmount, 5.0).is_ok());
        assert!(validate_value(DiscountValueType::FixedAmount, 0.0).is_err());
        assert!(validate_value(DiscountValueType::FixedAmount, -3.0).is_err());
        assert!(validate_value(DiscountValueType::FixedAmount, f64::INFINITY).is_err());
        assert!(validate_value(DiscountValueType::FixedAmount, f64::NAN).is_err());
    }

    #[test]
    fn test_subscription_fields_only_when_eligible() {
        let eligible = basic_discount_input(&input(DiscountValueType::Percentage, 0.2), true);
        assert_eq!(eligible["customerGets"]["appliesOnSubscription"], json!(true));
        assert_eq!(eligible["customerGets"]["appliesOnOneTimePurchase"], json!(true));
        assert_eq!(eligible["recurringCycleLimit"], json!(1));

        let plain = basic_discount_input(&input(DiscountValueType::Percentage, 0.2), false);
        assert!(plain["customerGets"].get("appliesOnSubscription").is_none());
        assert!(plain["customerGets"].get("appliesOnOneTimePurchase").is_none());
        assert!(plain.get("recurringCycleLimit").is_none());
    }

    #[test]
    fn test_discount_value_shapes() {
        let percentage = basic_discount_input(&input(DiscountValueType::Percentage, 0.25), false);
        assert_eq!(percentage["customerGets"]["value"], json!({"percentage": 0.25}));

        let fixed = basic_discount_input(&input(DiscountValueType::FixedAmount, 5.0), false);
        assert_eq!(
            fixed["customerGets"]["value"],
            json!({"discountAmount": {"amount": 5.0, "appliesOnEachItem": false}})
        );
    }

    #[test]
    fn test_collection_restriction_normalizes_ids() {
        let mut restricted = input(DiscountValueType::Percentage, 0.1);
        restricted.include_collection_ids = vec!["1".to_string(), "gid://shopify/Collection/2".to_string()];
        let body = basic_discount_input(&restricted, false);
        assert_eq!(
            body["customerGets"]["items"],
            json!({"collections": {"add": ["gid://shopify/Collection/1", "gid://shopify/Collection/2"]}})
        );

        let all = basic_discount_input(&input(DiscountValueType::Percentage, 0.1), false);
        assert_eq!(all["customerGets"]["items"], json!({"all": true}));
    }
}
