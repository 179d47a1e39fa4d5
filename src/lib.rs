//! Client for the Azure Event Grid event subscription API
//!
//! - [`arm`] - Request preparation, transport, paging and resource ids
//! - [`eventgrid`] - Event subscription models, advanced filters and listings
//! - [`config`] - Persistent user configuration
//! - [`error`] - Error types shared by every operation
//!
//! # Example
//!
//! ```ignore
//! use evgrid::arm::{ArmClient, SubscriptionId};
//! use evgrid::eventgrid::{EventSubscriptionsClient, ListOptions};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let options = evgrid::config::Config::load().client_options();
//!     let client = EventSubscriptionsClient::new(ArmClient::new(options)?);
//!     let all = client
//!         .list_global_by_subscription_complete(
//!             &SubscriptionId::new("0000-1111"),
//!             &ListOptions::new().with_top(50),
//!         )
//!         .await?;
//!     println!("{} subscriptions", all.items.len());
//!     Ok(())
//! }
//! ```

pub mod arm;
pub mod config;
pub mod error;
pub mod eventgrid;

pub use error::{Error, Result};
