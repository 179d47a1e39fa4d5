//! Resource identifiers
//!
//! Parent scopes that list operations are issued under. Each renders itself
//! to the leading URL path of a request.

use std::fmt;
use std::str::FromStr;

/// A resource identifier that renders to an ARM path such as
/// `/subscriptions/{id}`.
pub trait ResourceId {
    fn id(&self) -> String;
}

/// Error returned when a rendered identifier cannot be parsed back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parsing {kind} id {input:?}: expected {expected}")]
pub struct ParseResourceIdError {
    kind: &'static str,
    input: String,
    expected: &'static str,
}

/// `/subscriptions/{subscriptionId}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    pub subscription_id: String,
}

impl SubscriptionId {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
        }
    }
}

impl ResourceId for SubscriptionId {
    fn id(&self) -> String {
        format!("/subscriptions/{}", self.subscription_id)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscription (Subscription: {:?})", self.subscription_id)
    }
}

impl FromStr for SubscriptionId {
    type Err = ParseResourceIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match segments(input).as_slice() {
            [key, id] if key.eq_ignore_ascii_case("subscriptions") => Ok(Self::new(*id)),
            _ => Err(ParseResourceIdError {
                kind: "subscription",
                input: input.to_string(),
                expected: "/subscriptions/{subscriptionId}",
            }),
        }
    }
}

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
        }
    }

    /// The subscription this resource group belongs to
    pub fn subscription(&self) -> SubscriptionId {
        SubscriptionId::new(self.subscription_id.clone())
    }
}

impl ResourceId for ResourceGroupId {
    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription_id, self.resource_group_name
        )
    }
}

impl fmt::Display for ResourceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource Group (Subscription: {:?}, Resource Group Name: {:?})",
            self.subscription_id, self.resource_group_name
        )
    }
}

impl FromStr for ResourceGroupId {
    type Err = ParseResourceIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match segments(input).as_slice() {
            [sub_key, sub, rg_key, rg]
                if sub_key.eq_ignore_ascii_case("subscriptions")
                    && rg_key.eq_ignore_ascii_case("resourceGroups") =>
            {
                Ok(Self::new(*sub, *rg))
            }
            _ => Err(ParseResourceIdError {
                kind: "resource group",
                input: input.to_string(),
                expected: "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
            }),
        }
    }
}

fn segments(input: &str) -> Vec<&str> {
    input
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}
