//! Domain models for storefront.
//!
//! Business records themselves live in `marketstall-core`; this module holds
//! the request-scoped types the storefront keeps in the session.

pub mod session;

pub use session::{CurrentVendor, keys as session_keys};
