//! Cart service.
//!
//! One write path for both shopping modes. Guests mutate the session
//! snapshot directly. Signed-in accounts mutate their cart rows through
//! per-line statements, and every successful remote write refreshes the
//! session snapshot so a later store outage degrades to recent data
//! instead of an empty cart. When the store is unreachable the same
//! mutation is applied to the snapshot and the caller is told the write
//! only landed locally.

use sqlx::PgPool;
use tower_sessions::Session;

use raritone_core::{Cart, CartItem, LineKey};

use crate::db::UserRepository;
use crate::error::Result;
use crate::models::session::{read_snapshot, session_keys, write_snapshot};
use crate::models::{CurrentUser, StoreSession};

/// Where a cart write actually landed.
///
/// Serialized into mutation responses so clients can surface degraded
/// persistence instead of silently losing state on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "persistence", rename_all = "camelCase")]
pub enum PersistOutcome {
    /// Written to the account's rows (and mirrored to the session).
    Remote,
    /// Guest mode; the session snapshot is the only store.
    Local,
    /// Account mode, but the remote write failed and only the session
    /// snapshot was updated.
    #[serde(rename_all = "camelCase")]
    LocalFallback { reason: String },
}

/// A single cart mutation, applied identically to remote rows and to
/// the local snapshot.
#[derive(Debug, Clone)]
pub enum CartOp {
    /// Add a line, merging quantity into an existing line with the same
    /// product and size.
    Add(CartItem),
    /// Replace a line's quantity; zero removes the line.
    SetQuantity(LineKey, u32),
    /// Remove a line.
    Remove(LineKey),
}

impl CartOp {
    /// Apply this mutation to an in-memory cart.
    pub fn apply(&self, cart: &mut Cart) {
        match self {
            Self::Add(item) => cart.add(item.clone()),
            Self::SetQuantity(key, quantity) => {
                cart.set_quantity(key, *quantity);
            }
            Self::Remove(key) => {
                cart.remove(key);
            }
        }
    }
}

/// Cart operations over session snapshots and account rows.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a cart service backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the current cart.
    ///
    /// Accounts read their rows; a store failure falls back to the
    /// session snapshot. Guests read the snapshot only.
    ///
    /// # Errors
    ///
    /// Never fails on store errors (those degrade to the snapshot);
    /// only returns an error if the session itself cannot be read.
    pub async fn load(&self, session: &Session, who: &StoreSession) -> Result<Cart> {
        match who {
            StoreSession::Guest => Ok(self.snapshot(session).await),
            StoreSession::Account(user) => {
                match UserRepository::new(self.pool).get_cart(&user.id).await {
                    Ok(cart) => {
                        write_snapshot(session, session_keys::CART, &cart).await?;
                        Ok(cart)
                    }
                    Err(error) => {
                        tracing::warn!(%error, "Cart read failed, serving session snapshot");
                        Ok(self.snapshot(session).await)
                    }
                }
            }
        }
    }

    /// Apply a mutation for whoever is shopping.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session snapshot cannot be
    /// written; remote store failures degrade to `LocalFallback`.
    pub async fn mutate(
        &self,
        session: &Session,
        who: &StoreSession,
        op: CartOp,
    ) -> Result<(Cart, PersistOutcome)> {
        match who {
            StoreSession::Guest => {
                let mut cart = self.snapshot(session).await;
                op.apply(&mut cart);
                write_snapshot(session, session_keys::CART, &cart).await?;
                Ok((cart, PersistOutcome::Local))
            }
            StoreSession::Account(user) => match self.mutate_remote(user, &op).await {
                Ok(cart) => {
                    write_snapshot(session, session_keys::CART, &cart).await?;
                    Ok((cart, PersistOutcome::Remote))
                }
                Err(error) => {
                    tracing::warn!(%error, "Cart write failed, falling back to session snapshot");
                    let mut cart = self.snapshot(session).await;
                    op.apply(&mut cart);
                    write_snapshot(session, session_keys::CART, &cart).await?;
                    Ok((
                        cart,
                        PersistOutcome::LocalFallback {
                            reason: error.to_string(),
                        },
                    ))
                }
            },
        }
    }

    async fn mutate_remote(
        &self,
        user: &CurrentUser,
        op: &CartOp,
    ) -> std::result::Result<Cart, crate::db::RepositoryError> {
        let repo = UserRepository::new(self.pool);
        match op {
            CartOp::Add(item) => repo.upsert_cart_line(&user.id, item).await?,
            CartOp::SetQuantity(key, quantity) => {
                repo.set_cart_line_quantity(&user.id, key, *quantity).await?;
            }
            CartOp::Remove(key) => {
                repo.remove_cart_line(&user.id, key).await?;
            }
        }
        repo.get_cart(&user.id).await
    }

    /// Replace the session snapshot with the account's stored cart.
    ///
    /// Called at sign-in so the session reflects the account, not
    /// whatever the guest browsed before. A store failure keeps the
    /// guest snapshot as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the session snapshot cannot be written.
    pub async fn adopt_account_cart(&self, session: &Session, user: &CurrentUser) -> Result<()> {
        match UserRepository::new(self.pool).get_cart(&user.id).await {
            Ok(cart) => {
                write_snapshot(session, session_keys::CART, &cart).await?;
            }
            Err(error) => {
                tracing::warn!(%error, "Cart load at sign-in failed, keeping session snapshot");
            }
        }
        Ok(())
    }

    async fn snapshot(&self, session: &Session) -> Cart {
        read_snapshot(session, session_keys::CART)
            .await
            .unwrap_or_default()
    }
}

/// Drop the cart snapshot and identity from the session at sign-out.
///
/// The wishlist and recent searches deliberately survive sign-out; only
/// the cart and identity are account-scoped.
///
/// # Errors
///
/// Returns an error if the session cannot be updated.
pub async fn clear_for_logout(session: &Session) -> Result<()> {
    session
        .remove::<serde_json::Value>(session_keys::CART)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;
    use tower_sessions::MemoryStore;

    use raritone_core::{Email, Price, ProductId, UserId};

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .expect("lazy pool")
    }

    fn shopper() -> CurrentUser {
        CurrentUser {
            id: UserId::new("acct-1"),
            email: Email::parse("shopper@example.com").expect("email"),
            name: "Shopper".into(),
        }
    }

    fn item(product: &str, quantity: u32, size: Option<&str>) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: product.to_owned(),
            unit_price: Price::from_cents(1000),
            quantity,
            size: size.map(str::to_owned),
            image_url: String::new(),
        }
    }

    #[test]
    fn add_then_set_then_zero_matches_manual_sequence() {
        let mut cart = Cart::default();
        CartOp::Add(item("p1", 1, None)).apply(&mut cart);
        CartOp::Add(item("p1", 2, None)).apply(&mut cart);
        assert_eq!(cart.total_quantity(), 3);

        let key = LineKey {
            product_id: ProductId::new("p1"),
            size: None,
        };
        CartOp::SetQuantity(key.clone(), 0).apply(&mut cart);
        assert!(cart.is_empty());

        // Removing from an empty cart is a no-op
        CartOp::Remove(key).apply(&mut cart);
        assert!(cart.is_empty());
    }

    #[test]
    fn same_op_is_identical_on_both_stores_shapes() {
        // The remote path sends op, the fallback path applies op; a
        // sized and an unsized line of the same product stay distinct.
        let mut cart = Cart::default();
        CartOp::Add(item("p1", 1, Some("M"))).apply(&mut cart);
        CartOp::Add(item("p1", 1, None)).apply(&mut cart);
        assert_eq!(cart.len(), 2);

        CartOp::Remove(LineKey {
            product_id: ProductId::new("p1"),
            size: Some("M".into()),
        })
        .apply(&mut cart);
        assert_eq!(cart.len(), 1);
        assert!(cart.items()[0].size.is_none());
    }

    #[test]
    fn persist_outcome_serializes_with_tag() {
        let remote = serde_json::to_value(PersistOutcome::Remote).unwrap();
        assert_eq!(remote["persistence"], "remote");

        let fallback = serde_json::to_value(PersistOutcome::LocalFallback {
            reason: "store down".into(),
        })
        .unwrap();
        assert_eq!(fallback["persistence"], "localFallback");
        assert_eq!(fallback["reason"], "store down");
    }

    #[tokio::test]
    async fn remote_write_failure_degrades_to_session_snapshot() {
        let pool = unreachable_pool();
        let session = session();
        let user = shopper();
        let who = StoreSession::Account(user.clone());
        let service = CartService::new(&pool);

        let (cart, outcome) = service
            .mutate(&session, &who, CartOp::Add(item("p1", 2, None)))
            .await
            .expect("mutate");

        assert_eq!(cart.total_quantity(), 2);
        assert!(matches!(outcome, PersistOutcome::LocalFallback { reason } if !reason.is_empty()));

        // The mutation landed in the snapshot, so a degraded load
        // still serves it
        let loaded = service.load(&session, &who).await.expect("load");
        assert_eq!(loaded.total_quantity(), 2);
    }

    #[tokio::test]
    async fn fallback_mutations_accumulate_in_the_snapshot() {
        let pool = unreachable_pool();
        let session = session();
        let user = shopper();
        let who = StoreSession::Account(user);
        let service = CartService::new(&pool);

        service
            .mutate(&session, &who, CartOp::Add(item("p1", 1, Some("M"))))
            .await
            .expect("add");
        let (cart, _) = service
            .mutate(
                &session,
                &who,
                CartOp::SetQuantity(
                    LineKey {
                        product_id: ProductId::new("p1"),
                        size: Some("M".into()),
                    },
                    4,
                ),
            )
            .await
            .expect("set quantity");

        assert_eq!(cart.total_quantity(), 4);
    }

    #[tokio::test]
    async fn sign_in_adoption_keeps_snapshot_when_store_is_down() {
        let pool = unreachable_pool();
        let session = session();
        let user = shopper();
        let who = StoreSession::Account(user.clone());
        let service = CartService::new(&pool);

        service
            .mutate(&session, &who, CartOp::Add(item("p1", 3, None)))
            .await
            .expect("mutate");

        service
            .adopt_account_cart(&session, &user)
            .await
            .expect("adopt");

        let cart = service.load(&session, &who).await.expect("load");
        assert_eq!(cart.total_quantity(), 3);
    }
}
