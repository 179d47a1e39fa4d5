//! Event subscription listings
//!
//! Wraps [`ArmClient`] with the Event Grid listing operations. Each listing
//! can be fetched a page at a time, walked with a [`Pager`], or drained
//! completely with an optional predicate.

use super::models::EventSubscription;
use crate::arm::{
    ArmClient, CompleteResult, MatchAll, Page, Pager, Predicate, ResourceGroupId, ResourceId,
    SubscriptionId,
};
use crate::error::Result;

/// API version the models in this module were generated against
pub const DEFAULT_API_VERSION: &str = "2020-10-15-preview";

const PROVIDER: &str = "Microsoft.EventGrid";

/// Optional query parameters for listings. Unset fields are left out of the
/// request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    filter: Option<String>,
    top: Option<i64>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// OData `$filter` expression, e.g. `contains(name, 'orders')`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// `$top`: page size cap requested from the server
    pub fn with_top(mut self, top: i64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn top(&self) -> Option<i64> {
        self.top
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(filter) = &self.filter {
            out.push(("$filter".to_string(), filter.clone()));
        }
        if let Some(top) = self.top {
            out.push(("$top".to_string(), top.to_string()));
        }
        out
    }
}

/// Equality checks on the identifying fields of a subscription. Unset fields
/// are ignored, so the default predicate keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSubscriptionPredicate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub type_: Option<String>,
}

impl Predicate<EventSubscription> for EventSubscriptionPredicate {
    fn matches(&self, item: &EventSubscription) -> bool {
        fn field_matches(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                Some(want) => have.as_deref() == Some(want.as_str()),
                None => true,
            }
        }

        field_matches(&self.id, &item.id)
            && field_matches(&self.name, &item.name)
            && field_matches(&self.type_, &item.type_)
    }
}

/// Where a listing is issued from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Global subscriptions across a whole Azure subscription
    GlobalBySubscription(SubscriptionId),
    /// Global subscriptions within one resource group
    GlobalByResourceGroup(ResourceGroupId),
    /// Regional subscriptions in one location of an Azure subscription
    RegionalBySubscription {
        subscription: SubscriptionId,
        location: String,
    },
    /// Regional subscriptions in one location of a resource group
    RegionalByResourceGroup {
        resource_group: ResourceGroupId,
        location: String,
    },
}

impl ListScope {
    pub fn operation(&self) -> &'static str {
        match self {
            ListScope::GlobalBySubscription(_) => "EventSubscriptions.ListGlobalBySubscription",
            ListScope::GlobalByResourceGroup(_) => "EventSubscriptions.ListGlobalByResourceGroup",
            ListScope::RegionalBySubscription { .. } => {
                "EventSubscriptions.ListRegionalBySubscription"
            }
            ListScope::RegionalByResourceGroup { .. } => {
                "EventSubscriptions.ListRegionalByResourceGroup"
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            ListScope::GlobalBySubscription(id) => {
                format!("{}/providers/{}/eventSubscriptions", id.id(), PROVIDER)
            }
            ListScope::GlobalByResourceGroup(id) => {
                format!("{}/providers/{}/eventSubscriptions", id.id(), PROVIDER)
            }
            ListScope::RegionalBySubscription {
                subscription,
                location,
            } => format!(
                "{}/providers/{}/locations/{}/eventSubscriptions",
                subscription.id(),
                PROVIDER,
                location
            ),
            ListScope::RegionalByResourceGroup {
                resource_group,
                location,
            } => format!(
                "{}/providers/{}/locations/{}/eventSubscriptions",
                resource_group.id(),
                PROVIDER,
                location
            ),
        }
    }
}

/// Client for the Event Grid event subscription listings
#[derive(Clone)]
pub struct EventSubscriptionsClient {
    client: ArmClient,
}

impl EventSubscriptionsClient {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ArmClient {
        &self.client
    }

    /// Forward-only pager over a listing; nothing is sent until the first
    /// `next_page`
    pub fn pager(&self, scope: &ListScope, options: &ListOptions) -> Pager<EventSubscription> {
        Pager::new(
            self.client.clone(),
            scope.operation(),
            scope.path(),
            options.to_query(),
        )
    }

    /// Fetch the first page of a listing
    pub async fn list(
        &self,
        scope: &ListScope,
        options: &ListOptions,
    ) -> Result<Page<EventSubscription>> {
        self.client
            .get_page(scope.operation(), &scope.path(), &options.to_query())
            .await
    }

    /// Fetch the page after `page`
    pub async fn load_more(&self, page: &Page<EventSubscription>) -> Result<Page<EventSubscription>> {
        self.client.load_more(page).await
    }

    /// Drain every page of a listing
    pub async fn list_complete(
        &self,
        scope: &ListScope,
        options: &ListOptions,
    ) -> Result<CompleteResult<EventSubscription>> {
        self.list_complete_matching_predicate(scope, options, &MatchAll)
            .await
    }

    /// Drain every page of a listing, keeping items `predicate` accepts
    pub async fn list_complete_matching_predicate<P>(
        &self,
        scope: &ListScope,
        options: &ListOptions,
        predicate: &P,
    ) -> Result<CompleteResult<EventSubscription>>
    where
        P: Predicate<EventSubscription> + ?Sized,
    {
        self.pager(scope, options).collect_matching(predicate).await
    }

    pub async fn list_global_by_subscription(
        &self,
        id: &SubscriptionId,
        options: &ListOptions,
    ) -> Result<Page<EventSubscription>> {
        self.list(&ListScope::GlobalBySubscription(id.clone()), options)
            .await
    }

    pub async fn list_global_by_subscription_complete(
        &self,
        id: &SubscriptionId,
        options: &ListOptions,
    ) -> Result<CompleteResult<EventSubscription>> {
        self.list_complete(&ListScope::GlobalBySubscription(id.clone()), options)
            .await
    }

    pub async fn list_global_by_resource_group(
        &self,
        id: &ResourceGroupId,
        options: &ListOptions,
    ) -> Result<Page<EventSubscription>> {
        self.list(&ListScope::GlobalByResourceGroup(id.clone()), options)
            .await
    }

    pub async fn list_global_by_resource_group_complete(
        &self,
        id: &ResourceGroupId,
        options: &ListOptions,
    ) -> Result<CompleteResult<EventSubscription>> {
        self.list_complete(&ListScope::GlobalByResourceGroup(id.clone()), options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_encode_nothing() {
        assert!(ListOptions::new().to_query().is_empty());
    }

    #[test]
    fn test_options_encode_only_set_fields() {
        let top_only = ListOptions::new().with_top(5).to_query();
        assert_eq!(top_only, vec![("$top".to_string(), "5".to_string())]);

        let both = ListOptions::new()
            .with_filter("contains(name, 'x')")
            .with_top(20)
            .to_query();
        assert_eq!(
            both,
            vec![
                ("$filter".to_string(), "contains(name, 'x')".to_string()),
                ("$top".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_scope_paths() {
        let sub = SubscriptionId::new("abc");
        assert_eq!(
            ListScope::GlobalBySubscription(sub.clone()).path(),
            "/subscriptions/abc/providers/Microsoft.EventGrid/eventSubscriptions"
        );
        assert_eq!(
            ListScope::GlobalByResourceGroup(ResourceGroupId::new("abc", "rg")).path(),
            "/subscriptions/abc/resourceGroups/rg/providers/Microsoft.EventGrid/eventSubscriptions"
        );
        assert_eq!(
            ListScope::RegionalBySubscription {
                subscription: sub,
                location: "westeurope".to_string(),
            }
            .path(),
            "/subscriptions/abc/providers/Microsoft.EventGrid/locations/westeurope/eventSubscriptions"
        );
    }

    #[test]
    fn test_default_predicate_matches_all() {
        let predicate = EventSubscriptionPredicate::default();
        assert!(predicate.matches(&EventSubscription::default()));
    }

    #[test]
    fn test_predicate_compares_set_fields() {
        let predicate = EventSubscriptionPredicate {
            name: Some("orders".to_string()),
            ..Default::default()
        };

        let orders = EventSubscription {
            name: Some("orders".to_string()),
            id: Some("/x".to_string()),
            ..Default::default()
        };
        let billing = EventSubscription {
            name: Some("billing".to_string()),
            ..Default::default()
        };

        assert!(predicate.matches(&orders));
        assert!(!predicate.matches(&billing));
        assert!(!predicate.matches(&EventSubscription::default()));
    }
}
