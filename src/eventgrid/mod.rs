//! Event Grid event subscriptions
//!
//! - [`filters`] - Advanced filters tagged by `operatorType`
//! - [`models`] - Event subscription resource models
//! - [`subscriptions`] - Listing operations, options and predicates

pub mod filters;
pub mod models;
pub mod subscriptions;

pub use filters::{
    AdvancedFilter, BoolFilter, KeyFilter, NumberFilter, NumberRangeFilter, NumberSetFilter,
    StringSetFilter, DISCRIMINATOR,
};
pub use models::{EventSubscription, EventSubscriptionFilter, EventSubscriptionProperties, RetryPolicy};
pub use subscriptions::{
    EventSubscriptionPredicate, EventSubscriptionsClient, ListOptions, ListScope,
    DEFAULT_API_VERSION,
};
