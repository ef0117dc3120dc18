//! Wishlist service.
//!
//! The wishlist is a session-scoped set of product ids with insertion
//! order preserved. It is deliberately not account-scoped: it survives
//! sign-out and is shared by whoever uses the browser, which is the
//! behavior the storefront has always had.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use raritone_core::ProductId;

use crate::error::Result;
use crate::models::session::{read_snapshot, session_keys, write_snapshot};

/// An ordered set of wished-for product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<ProductId>);

impl Wishlist {
    /// Toggle a product's membership. Returns `true` if the product was
    /// added, `false` if it was removed.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if let Some(index) = self.0.iter().position(|id| *id == product_id) {
            self.0.remove(index);
            false
        } else {
            self.0.push(product_id);
            true
        }
    }

    /// Whether a product is on the list.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.0.iter().any(|id| id == product_id)
    }

    /// Product ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Load the session wishlist, defaulting to empty.
pub async fn load(session: &Session) -> Wishlist {
    read_snapshot(session, session_keys::WISHLIST)
        .await
        .unwrap_or_default()
}

/// Toggle a product on the session wishlist.
///
/// Returns the updated list and whether the product ended up on it.
///
/// # Errors
///
/// Returns an error if the session snapshot cannot be written.
pub async fn toggle(session: &Session, product_id: ProductId) -> Result<(Wishlist, bool)> {
    let mut wishlist = load(session).await;
    let added = wishlist.toggle(product_id);
    write_snapshot(session, session_keys::WISHLIST, &wishlist).await?;
    Ok((wishlist, added))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_returns_to_original_state() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(ProductId::new("p1")));
        assert!(wishlist.contains(&ProductId::new("p1")));
        assert!(!wishlist.toggle(ProductId::new("p1")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn toggle_preserves_insertion_order_of_others() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle(ProductId::new("a"));
        wishlist.toggle(ProductId::new("b"));
        wishlist.toggle(ProductId::new("c"));
        wishlist.toggle(ProductId::new("b"));

        let ids: Vec<_> = wishlist.ids().iter().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle(ProductId::new("p1"));
        let json = serde_json::to_string(&wishlist).unwrap();
        assert_eq!(json, r#"["p1"]"#);
    }
}
