//! Business logic services for storefront.
//!
//! # Services
//!
//! - [`views`] - Resolved storefront views, cached per slug
//! - [`publishing`] - Draft/publish transitions for vendor edits
//! - [`tenant`] - Which business a vendor is managing in this session

pub mod publishing;
pub mod tenant;
pub mod views;

pub use publishing::{PublishOutcome, PublishingService};
pub use tenant::{TenantError, TenantSelection};
pub use views::StorefrontViews;
