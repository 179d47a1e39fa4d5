//! Event subscription models

use super::filters::AdvancedFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A subscription binding an event source to a destination
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventSubscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<EventSubscriptionProperties>,
}

impl EventSubscription {
    /// Advanced filters configured on this subscription, if any
    pub fn advanced_filters(&self) -> &[AdvancedFilter] {
        self.properties
            .as_ref()
            .and_then(|p| p.filter.as_ref())
            .and_then(|f| f.advanced_filters.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// Destination is polymorphic on `endpointType`; kept as raw JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<EventSubscriptionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_delivery_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_destination: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_begins_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ends_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_event_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subject_case_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_advanced_filtering_on_arrays: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_filters: Option<Vec<AdvancedFilter>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_attempts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time_to_live_in_minutes: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventgrid::filters::{NumberFilter, StringSetFilter};
    use serde_json::json;

    #[test]
    fn test_decode_subscription_with_filters() {
        let sub: EventSubscription = serde_json::from_value(json!({
            "id": "/subscriptions/abc/providers/Microsoft.EventGrid/eventSubscriptions/sub1",
            "name": "sub1",
            "type": "Microsoft.EventGrid/eventSubscriptions",
            "properties": {
                "topic": "/subscriptions/abc",
                "provisioningState": "Succeeded",
                "destination": {"endpointType": "WebHook", "properties": {}},
                "expirationTimeUtc": "2026-01-01T00:00:00Z",
                "retryPolicy": {"maxDeliveryAttempts": 30, "eventTimeToLiveInMinutes": 1440},
                "filter": {
                    "includedEventTypes": ["Microsoft.Resources.ResourceWriteSuccess"],
                    "advancedFilters": [
                        {"operatorType": "NumberLessThan", "key": "data.temp", "value": 10},
                        {"operatorType": "StringBeginsWith", "key": "subject", "values": ["/a"]}
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(sub.name.as_deref(), Some("sub1"));
        let props = sub.properties.as_ref().unwrap();
        assert_eq!(props.provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(
            props.retry_policy.as_ref().unwrap().max_delivery_attempts,
            Some(30)
        );
        assert_eq!(
            sub.advanced_filters(),
            &[
                AdvancedFilter::NumberLessThan(NumberFilter {
                    value: Some(10.0),
                    key: Some("data.temp".to_string()),
                }),
                AdvancedFilter::StringBeginsWith(StringSetFilter {
                    values: Some(vec!["/a".to_string()]),
                    key: Some("subject".to_string()),
                }),
            ]
        );
    }

    #[test]
    fn test_unknown_filter_fails_whole_subscription() {
        let result = serde_json::from_value::<EventSubscription>(json!({
            "name": "sub1",
            "properties": {"filter": {"advancedFilters": [{"operatorType": "Mystery"}]}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_omits_absent_fields() {
        let sub = EventSubscription {
            name: Some("sub1".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&sub).unwrap(), json!({"name": "sub1"}));
    }

    #[test]
    fn test_no_filters_is_empty_slice() {
        assert!(EventSubscription::default().advanced_filters().is_empty());
    }
}
