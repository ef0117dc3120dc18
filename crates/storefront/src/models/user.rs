//! Account domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use raritone_core::{Email, RecentSearches, ScanSnapshot, UserId};

/// A storefront account (domain type).
///
/// Created on first successful sign-in; the identity provider owns the
/// credentials, this row owns everything the storefront knows about the
/// person.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Identity-provider-issued account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Profile image URL, if one was set by the provider.
    pub profile_image: Option<String>,
    /// Recent search terms, newest first.
    pub recent_searches: RecentSearches,
    /// Latest scan measurement snapshot, if the account has ever scanned.
    pub scan_snapshot: Option<ScanSnapshot>,
    /// Administrative flag.
    pub is_admin: bool,
    /// When the account row was created.
    pub created_at: DateTime<Utc>,
}
