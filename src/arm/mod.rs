//! Azure Resource Manager plumbing
//!
//! Everything needed to issue versioned list calls against the management
//! surface, independent of any one resource provider.
//!
//! # Module Structure
//!
//! - [`client`] - Request preparation and response decoding
//! - [`http`] - Transport trait and the default reqwest transport
//! - [`paging`] - Pages, predicates and the forward-only pager
//! - [`resource_id`] - Parent scopes rendered to URL paths
//!
//! # Example
//!
//! ```ignore
//! use evgrid::arm::{ArmClient, ClientOptions};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ArmClient::new(ClientOptions::new(
//!         "https://management.azure.com",
//!         "2020-10-15-preview",
//!     ))?;
//!     let page: evgrid::arm::Page<serde_json::Value> = client
//!         .get_page("Example.List", "/subscriptions/abc/resourceGroups", &[])
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod paging;
pub mod resource_id;

pub use client::{ArmClient, ClientOptions, DEFAULT_BASE_URI};
pub use http::{ArmHttpClient, RawResponse, Transport};
pub use paging::{CompleteResult, MatchAll, Page, Pager, Predicate};
pub use resource_id::{ParseResourceIdError, ResourceGroupId, ResourceId, SubscriptionId};
