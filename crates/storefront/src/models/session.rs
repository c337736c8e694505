//! Session-related types.
//!
//! Types stored in the session for vendor identity and tenant selection.

use serde::{Deserialize, Serialize};

use marketstall_core::Email;

/// Session-stored vendor identity.
///
/// Set by the demo login; minimal data to identify the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentVendor {
    /// Vendor's display name.
    pub name: String,
    /// Vendor's email address, the key for business ownership.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in vendor.
    pub const CURRENT_VENDOR: &str = "current_vendor";

    /// Key for the business the vendor is managing.
    pub const SELECTED_BUSINESS: &str = "selected_business";
}
