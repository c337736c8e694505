//! Marketstall Core - Tenant domain types and settings resolution.
//!
//! This crate provides the types shared by all Marketstall components:
//! - `storefront` - Public storefront API and vendor portal
//! - `cli` - Seed validation and inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no locks,
//! no HTTP. Anything that stores or mutates businesses lives in the
//! storefront crate and calls into the transition helpers defined here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, and slugs
//! - [`business`] - The tenant record and its draft/published overlays
//! - [`resolver`] - Effective and draft views of a business

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod business;
pub mod resolver;
pub mod types;

pub use business::{
    Business, Contact, InvariantViolation, LifecycleState, NavLink, Owner, SettingsOverride,
    Social, StoreSettings, Theme,
};
pub use resolver::{ResolvedBusiness, resolve_draft, resolve_effective};
pub use types::*;
