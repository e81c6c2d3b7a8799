//! Webhook subscriptions.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::types::Connection;
use super::{
    graphql_context, take_at, ShopifyClient, WebhookAction, WebhookOutcome, WebhookSubscription,
    USER_ERRORS,
};
use crate::clients::{ErrorContext, ShopifyError};
use crate::config::CanonicalDomain;
use crate::gid::{GlobalId, ResourceType};

const LIST_LIMIT: u32 = 100;

const SUBSCRIPTION_FIELDS: &str = r"
fragment SubscriptionFields on WebhookSubscription {
  id
  topic
  format
  createdAt
  endpoint {
    __typename
    ... on WebhookHttpEndpoint { callbackUrl }
  }
}";

const LIST_WEBHOOKS: &str = r"
query ListWebhooks($first: Int!, $callbackUrl: URL, $topics: [WebhookSubscriptionTopic!]) {
  webhookSubscriptions(first: $first, callbackUrl: $callbackUrl, topics: $topics) {
    edges { node { ...SubscriptionFields } }
  }
}";

const SUBSCRIBE_WEBHOOK: &str = r"
mutation SubscribeWebhook($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
  webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
    webhookSubscription { ...SubscriptionFields }
    userErrors { field message }
  }
}";

const UNSUBSCRIBE_WEBHOOK: &str = r"
mutation UnsubscribeWebhook($id: ID!) {
  webhookSubscriptionDelete(id: $id) {
    deletedWebhookSubscriptionId
    userErrors { field message }
  }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionNode {
    id: String,
    topic: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    endpoint: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    #[serde(default)]
    callback_url: Option<String>,
}

impl From<SubscriptionNode> for WebhookSubscription {
    fn from(node: SubscriptionNode) -> Self {
        Self {
            id: node.id,
            topic: node.topic,
            callback_url: node.endpoint.and_then(|endpoint| endpoint.callback_url),
            format: node.format,
            created_at: node.created_at,
        }
    }
}

/// Turns `orders/create` or `ORDERS_CREATE` into the GraphQL enum form.
fn topic_enum(topic: &str) -> String {
    topic.trim().replace('/', "_").to_uppercase()
}

fn with_fragment(document: &str) -> String {
    format!("{document}\n{SUBSCRIPTION_FIELDS}")
}

impl ShopifyClient {
    /// Subscribes, finds, or unsubscribes a webhook.
    ///
    /// `subscribe` and `find` need a topic; `unsubscribe` needs the
    /// subscription id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Input`] if an argument the action needs is
    /// missing, [`ShopifyError::User`] if the API rejects the change, or the
    /// resolution or transport error.
    #[instrument(skip(self))]
    pub async fn manage_webhook(
        &self,
        action: WebhookAction,
        callback_url: &str,
        topic: Option<&str>,
        webhook_id: Option<&str>,
    ) -> Result<WebhookOutcome, ShopifyError> {
        let params = ErrorContext::with_params(json!({
            "action": action,
            "callback_url": callback_url,
            "topic": topic,
            "webhook_id": webhook_id,
        }));
        let missing = |what: &str| {
            self.fail(ShopifyError::input(
                format!("{what} is required to {action:?} a webhook").to_lowercase(),
                params.clone(),
            ))
        };

        match action {
            WebhookAction::Subscribe => {
                let topic = topic.ok_or_else(|| missing("Topic"))?;
                let domain = self.canonical_domain().await?;
                let subscription = self.subscribe_on(&domain, callback_url, topic).await?;
                Ok(WebhookOutcome {
                    action,
                    subscription: Some(subscription),
                    deleted_id: None,
                })
            }
            WebhookAction::Find => {
                let topic = topic.ok_or_else(|| missing("Topic"))?;
                let domain = self.canonical_domain().await?;
                let found = self
                    .subscriptions_on(&domain, Some(callback_url), Some(topic), 1)
                    .await?;
                Ok(WebhookOutcome {
                    action,
                    subscription: found.into_iter().next(),
                    deleted_id: None,
                })
            }
            WebhookAction::Unsubscribe => {
                let id = webhook_id.ok_or_else(|| missing("Webhook id"))?;
                let domain = self.canonical_domain().await?;
                let deleted = self.unsubscribe_on(&domain, id).await?;
                Ok(WebhookOutcome {
                    action,
                    subscription: None,
                    deleted_id: Some(deleted),
                })
            }
        }
    }

    /// Lists webhook subscriptions, optionally only those for `callback_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if resolution or the query fails.
    #[instrument(skip(self))]
    pub async fn list_webhooks(
        &self,
        callback_url: Option<&str>,
    ) -> Result<Vec<WebhookSubscription>, ShopifyError> {
        let domain = self.canonical_domain().await?;
        self.subscriptions_on(&domain, callback_url, None, LIST_LIMIT)
            .await
    }

    async fn subscriptions_on(
        &self,
        domain: &CanonicalDomain,
        callback_url: Option<&str>,
        topic: Option<&str>,
        first: u32,
    ) -> Result<Vec<WebhookSubscription>, ShopifyError> {
        let query = with_fragment(LIST_WEBHOOKS);
        let variables = json!({
            "first": first,
            "callbackUrl": callback_url,
            "topics": topic.map(|topic| vec![topic_enum(topic)]),
        });
        let context = graphql_context(&query, variables.clone());
        let mut data = self.graphql(domain, &query, variables).await?;
        let connection: Connection<SubscriptionNode> = self.decode(
            take_at(&mut data, "/webhookSubscriptions"),
            "webhook subscriptions",
            &context,
        )?;
        Ok(connection
            .into_nodes()
            .into_iter()
            .map(WebhookSubscription::from)
            .collect())
    }

    async fn subscribe_on(
        &self,
        domain: &CanonicalDomain,
        callback_url: &str,
        topic: &str,
    ) -> Result<WebhookSubscription, ShopifyError> {
        let query = with_fragment(SUBSCRIBE_WEBHOOK);
        let variables = json!({
            "topic": topic_enum(topic),
            "webhookSubscription": { "callbackUrl": callback_url, "format": "JSON" },
        });
        let context = graphql_context(&query, variables.clone());
        let mut data = self.graphql(domain, &query, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "webhookSubscriptionCreate",
            USER_ERRORS,
            &context,
        )?;
        let node: SubscriptionNode = self.decode(
            take_at(&mut payload, "/webhookSubscription"),
            "webhook subscription",
            &context,
        )?;
        Ok(node.into())
    }

    async fn unsubscribe_on(
        &self,
        domain: &CanonicalDomain,
        webhook_id: &str,
    ) -> Result<String, ShopifyError> {
        let variables = json!({
            "id": GlobalId::normalize(webhook_id, ResourceType::WebhookSubscription),
        });
        let context = graphql_context(UNSUBSCRIBE_WEBHOOK, variables.clone());
        let mut data = self.graphql(domain, UNSUBSCRIBE_WEBHOOK, variables).await?;
        let mut payload = self.mutation_payload(
            &mut data,
            "webhookSubscriptionDelete",
            USER_ERRORS,
            &context,
        )?;
        let deleted: Value = take_at(&mut payload, "/deletedWebhookSubscriptionId");
        self.decode(deleted, "deleted webhook id", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_enum() {
        assert_eq!(topic_enum("orders/create"), "ORDERS_CREATE");
        assert_eq!(topic_enum("APP_UNINSTALLED"), "APP_UNINSTALLED");
        assert_eq!(topic_enum(" products/update "), "PRODUCTS_UPDATE");
    }

    #[test]
    fn test_subscription_node_reads_http_endpoint() {
        let node: SubscriptionNode = serde_json::from_value(json!({
            "id": "gid://shopify/WebhookSubscription/1",
            "topic": "ORDERS_CREATE",
            "format": "JSON",
            "createdAt": "2026-01-01T00:00:00Z",
            "endpoint": {"__typename": "WebhookHttpEndpoint", "callbackUrl": "https://example.com/hook"}
        }))
        .unwrap();
        let subscription = WebhookSubscription::from(node);
        assert_eq!(subscription.callback_url.as_deref(), Some("https://example.com/hook"));
    }

    #[test]
    fn test_subscription_node_without_http_endpoint() {
        let node: SubscriptionNode = serde_json::from_value(json!({
            "id": "gid://shopify/WebhookSubscription/2",
            "topic": "ORDERS_CREATE",
            "endpoint": {"__typename": "WebhookEventBridgeEndpoint"}
        }))
        .unwrap();
        assert_eq!(WebhookSubscription::from(node).callback_url, None);
    }
}
