//! Session-related types.
//!
//! The tower-session is the storefront's guest-scoped key-value store: it
//! holds the signed-in identity plus the local snapshots (cart, wishlist,
//! recent searches) that survive when no account is present or when the
//! remote store is unreachable.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tower_sessions::Session;

use raritone_core::{Email, UserId};

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the guest/fallback cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the wishlist snapshot.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the recent-search snapshot.
    pub const RECENT_SEARCHES: &str = "recent_searches";
}

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity-provider-issued account ID.
    pub id: UserId,
    /// Account email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}

/// The session's view of who is shopping.
///
/// A tagged variant rather than a nullable user, so call sites match on
/// the two modes instead of null-checking.
#[derive(Debug, Clone)]
pub enum StoreSession {
    /// No identity present; state lives in session snapshots only.
    Guest,
    /// Signed-in account; state lives in the account's rows, with the
    /// session snapshots as fallback.
    Account(CurrentUser),
}

impl StoreSession {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Guest => None,
            Self::Account(user) => Some(user),
        }
    }
}

/// Current schema version of session snapshots.
///
/// The original storefront stored raw JSON arrays with no version field;
/// the version wrapper exists so a future schema change can migrate or
/// discard old snapshots instead of misreading them.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A versioned session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// Snapshot schema version.
    pub version: u32,
    /// The stored value.
    pub data: T,
}

/// Read a versioned snapshot from the session.
///
/// A missing key, a read failure, or a version mismatch all yield `None`;
/// callers fall back to an empty default, which is the behavior the
/// original storefront had for absent local-storage values.
pub async fn read_snapshot<T: DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    let snapshot: Snapshot<T> = session.get(key).await.ok().flatten()?;
    if snapshot.version == SNAPSHOT_VERSION {
        Some(snapshot.data)
    } else {
        tracing::warn!(key, version = snapshot.version, "Discarding snapshot with unknown version");
        None
    }
}

/// Write a versioned snapshot to the session.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn write_snapshot<T: Serialize + Send + Sync>(
    session: &Session,
    key: &str,
    data: &T,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(
            key,
            Snapshot {
                version: SNAPSHOT_VERSION,
                data,
            },
        )
        .await
}
