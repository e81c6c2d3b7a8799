//! Shop lookup, domain resolution, and feature checks.

use serde_json::{json, Value};
use tracing::instrument;

use super::{graphql_context, take_at, Shop, ShopDetails, ShopifyClient};
use crate::clients::{ErrorContext, HttpMethod, HttpRequest, ShopifyError};
use crate::config::CanonicalDomain;

const LOAD_SHOP_DETAILS: &str = r"
query LoadShopDetails {
  shop {
    name
    email
    currencyCode
    shipsToCountries
    myshopifyDomain
    primaryDomain { host url }
  }
}";

const CHECK_SUBSCRIPTION_ELIGIBILITY: &str = r"
query CheckSubscriptionEligibility {
  shop {
    features {
      eligibleForSubscriptions
      sellsSubscriptions
    }
  }
}";

impl ShopifyClient {
    /// Loads the shop record from the REST `shop.json` endpoint.
    ///
    /// The request goes to the handle the client was built with.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error, or a general error if the
    /// body has no `shop` object.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn load_shop(&self) -> Result<Shop, ShopifyError> {
        self.load_shop_on(self.store().as_ref()).await
    }

    async fn load_shop_on(&self, domain: &str) -> Result<Shop, ShopifyError> {
        let request = self.build(HttpRequest::builder(HttpMethod::Get, "shop.json"))?;
        let mut response = self.rest(domain, request).await?;
        let context = ErrorContext {
            url: Some(format!("{domain}/shop.json")),
            ..ErrorContext::default()
        };
        self.decode(take_at(&mut response.body, "/shop"), "shop", &context)
    }

    /// Returns the store's canonical `*.myshopify.com` domain.
    ///
    /// A handle that already is canonical is returned without a request;
    /// anything else is looked up through `shop.json`.
    ///
    /// # Errors
    ///
    /// Returns the shop lookup error, or a general error if the reported
    /// domain is not a valid host name.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn canonical_domain(&self) -> Result<CanonicalDomain, ShopifyError> {
        if let Some(domain) = self.store().canonical() {
            return Ok(domain);
        }

        let shop = self.load_shop_on(self.store().as_ref()).await?;
        CanonicalDomain::from_lookup(&shop.myshopify_domain).map_err(|e| {
            self.fail(ShopifyError::general(
                format!(
                    "Shop lookup for {} returned an invalid domain",
                    self.store()
                ),
                ErrorContext::with_params(json!({ "myshopify_domain": shop.myshopify_domain })),
                e,
            ))
        })
    }

    /// Loads name, currency, and shipping countries through GraphQL.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn load_shop_details(&self) -> Result<ShopDetails, ShopifyError> {
        let domain = self.canonical_domain().await?;
        let mut data = self
            .graphql(&domain, LOAD_SHOP_DETAILS, json!({}))
            .await?;
        self.decode(
            take_at(&mut data, "/shop"),
            "shop details",
            &graphql_context(LOAD_SHOP_DETAILS, json!({})),
        )
    }

    /// Returns whether the shop can sell subscriptions.
    ///
    /// Both `eligibleForSubscriptions` and `sellsSubscriptions` must be set.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn check_subscription_eligibility(&self) -> Result<bool, ShopifyError> {
        let domain = self.canonical_domain().await?;
        self.subscription_eligibility_on(&domain).await
    }

    pub(crate) async fn subscription_eligibility_on(
        &self,
        domain: &CanonicalDomain,
    ) -> Result<bool, ShopifyError> {
        let mut data = self
            .graphql(domain, CHECK_SUBSCRIPTION_ELIGIBILITY, json!({}))
            .await?;
        let features = take_at(&mut data, "/shop/features");
        let flag = |name: &str| features.get(name).and_then(Value::as_bool).unwrap_or(false);
        Ok(flag("eligibleForSubscriptions") && flag("sellsSubscriptions"))
    }
}
