//! Product catalog record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product.
///
/// Products are created administratively (via the CLI seeder here) and
/// read-only to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Primary image URL.
    pub image_url: String,
    /// Optional secondary (back) image URL.
    pub back_image_url: Option<String>,
    /// Category label (e.g. "Tops", "Outerwear").
    pub category: String,
    /// Units in stock. Zero means unavailable.
    pub stock: u32,
    /// Free-text tags for search matching.
    pub tags: Vec<String>,
    /// Size labels offered, if the product is sized.
    pub sizes: Option<Vec<String>>,
    /// Color labels offered, if the product comes in colors.
    pub colors: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Three-way stock availability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockStatus {
    /// Only products with stock > 0.
    InStock,
    /// Only products with stock == 0.
    OutOfStock,
}

impl StockStatus {
    /// Whether the given product passes this filter.
    #[must_use]
    pub const fn matches(self, product: &Product) -> bool {
        match self {
            Self::InStock => product.stock > 0,
            Self::OutOfStock => product.stock == 0,
        }
    }

    /// Parse a query-string value. Unknown or empty values mean "no
    /// filtering" and yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "inStock" => Some(Self::InStock),
            "outOfStock" => Some(Self::OutOfStock),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Test".into(),
            description: String::new(),
            price: Price::from_cents(100),
            image_url: String::new(),
            back_image_url: None,
            category: "Tops".into(),
            stock,
            tags: Vec::new(),
            sizes: None,
            colors: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stock_status_partitions_are_disjoint() {
        let in_stock = product(10);
        let sold_out = product(0);

        assert!(StockStatus::InStock.matches(&in_stock));
        assert!(!StockStatus::InStock.matches(&sold_out));
        assert!(StockStatus::OutOfStock.matches(&sold_out));
        assert!(!StockStatus::OutOfStock.matches(&in_stock));
    }

    #[test]
    fn parse_accepts_known_values_only() {
        assert_eq!(StockStatus::parse("inStock"), Some(StockStatus::InStock));
        assert_eq!(
            StockStatus::parse("outOfStock"),
            Some(StockStatus::OutOfStock)
        );
        assert_eq!(StockStatus::parse(""), None);
        assert_eq!(StockStatus::parse("backordered"), None);
    }
}
