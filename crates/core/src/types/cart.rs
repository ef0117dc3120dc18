//! Shopping cart domain model.
//!
//! A cart is a list of lines keyed by (product id, size): the same product
//! in two sizes is two distinct lines. All mutation goes through [`Cart`],
//! which maintains the invariant that every line has a positive quantity.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Identity of a cart line: the (product id, size) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Product identifier.
    pub product_id: ProductId,
    /// Size label, if the product was added in a specific size.
    pub size: Option<String>,
}

impl LineKey {
    /// Create a line key.
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<String>) -> Self {
        Self { product_id, size }
    }
}

/// A single cart line.
///
/// Carries a display-name and unit-price snapshot taken when the product
/// was added, so later catalog edits do not rewrite carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier.
    pub product_id: ProductId,
    /// Product display name at the time of adding.
    pub name: String,
    /// Unit price at the time of adding.
    pub unit_price: Price,
    /// Line quantity. Always positive inside a [`Cart`].
    pub quantity: u32,
    /// Size label, if one was chosen.
    pub size: Option<String>,
    /// Product image URL for display.
    pub image_url: String,
}

impl CartItem {
    /// The (product id, size) identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.size.clone())
    }

    /// The line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A shopping cart.
///
/// Lines keep insertion order. The cart never contains a line with
/// quantity zero or below: merges are additive, and a quantity update to
/// zero or less removes the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing lines, merging duplicate keys and
    /// dropping non-positive quantities.
    ///
    /// Used when loading persisted carts, so a stored snapshot that
    /// predates the invariants still loads cleanly.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        cart
    }

    /// Add a line. If a line with the same (product id, size) exists, the
    /// quantities are added; otherwise the line is appended.
    ///
    /// A candidate with a non-positive quantity is ignored.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|line| line.key() == key) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Remove the line with the given key. Removing an absent line is a
    /// no-op.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.key() != *key);
        self.items.len() != before
    }

    /// Set the quantity of the line with the given key.
    ///
    /// A quantity of zero (or, at call sites with signed input, anything
    /// below) removes the line instead of storing a non-positive quantity.
    /// Setting a quantity on an absent line is a no-op.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) {
        if quantity == 0 {
            self.remove(key);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.key() == *key) {
            line.quantity = quantity;
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Subtotal across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .fold(Price::ZERO, |acc, line| acc.plus(line.line_total()))
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: &str, size: Option<&str>, quantity: u32, cents: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            unit_price: Price::from_cents(cents),
            quantity,
            size: size.map(str::to_owned),
            image_url: format!("https://img.example/{product}.jpg"),
        }
    }

    #[test]
    fn distinct_keys_create_distinct_lines() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        cart.add(line("1", Some("L"), 2, 696));
        cart.add(line("2", None, 1, 1000));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn matching_key_merges_quantities_additively() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        cart.add(line("1", Some("M"), 2, 696));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn same_product_different_size_is_a_separate_line() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        cart.add(line("1", Some("S"), 1, 696));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn quantity_zero_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        cart.add(line("1", Some("M"), 2, 696));
        assert_eq!(cart.items()[0].quantity, 3);

        cart.set_quantity(&LineKey::new(ProductId::new("1"), Some("M".into())), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn no_line_ever_has_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add(line("1", None, 0, 696));
        assert!(cart.is_empty());

        cart.add(line("1", None, 2, 696));
        cart.set_quantity(&LineKey::new(ProductId::new("1"), None), 0);
        assert!(cart.items().iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn removing_an_absent_line_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        let before = cart.clone();

        let removed = cart.remove(&LineKey::new(ProductId::new("9"), None));
        assert!(!removed);
        assert_eq!(cart, before);
    }

    #[test]
    fn set_quantity_replaces_rather_than_adds() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 3, 696));
        cart.set_quantity(&LineKey::new(ProductId::new("1"), Some("M".into())), 5);

        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let mut cart = Cart::new();
        cart.add(line("1", None, 2, 696));
        cart.add(line("2", None, 1, 1000));

        assert_eq!(cart.subtotal(), Price::from_cents(2392));
    }

    #[test]
    fn from_items_merges_and_drops_bad_lines() {
        let cart = Cart::from_items(vec![
            line("1", Some("M"), 1, 696),
            line("1", Some("M"), 2, 696),
            line("2", None, 0, 1000),
        ]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    // The worked example from the cart requirements: add 1, add 2 more,
    // then set the quantity to zero.
    #[test]
    fn add_add_then_zero_round_trip() {
        let mut cart = Cart::new();
        cart.add(line("1", Some("M"), 1, 696));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.add(line("1", Some("M"), 2, 696));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);

        cart.set_quantity(&LineKey::new(ProductId::new("1"), Some("M".into())), 0);
        assert!(cart.is_empty());
    }
}
