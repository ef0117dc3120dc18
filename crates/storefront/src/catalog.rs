//! Catalog filtering and sorting.
//!
//! A pure function over (product list, filter configuration): no I/O, no
//! pagination, the full filtered set is returned at once.

use raritone_core::{Product, StockStatus};

/// Sort order for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Creation timestamp descending.
    #[default]
    Newest,
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
    /// Stock count descending. Stock stands in for a popularity signal
    /// until order data exists to rank by.
    Popular,
}

impl SortKey {
    /// Parse a query-string value; unknown values fall back to newest.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "priceLow" => Self::PriceLow,
            "priceHigh" => Self::PriceHigh,
            "popular" => Self::Popular,
            _ => Self::Newest,
        }
    }

    /// Stable string form for echoing back to clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "priceLow",
            Self::PriceHigh => "priceHigh",
            Self::Popular => "popular",
        }
    }
}

/// Catalog filter configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Free-text query matched case-insensitively against name,
    /// description, and tags.
    pub query: Option<String>,
    /// Exact category label.
    pub category: Option<String>,
    /// Three-way stock filter; `None` means no filtering.
    pub stock: Option<StockStatus>,
    /// Sort order.
    pub sort: SortKey,
}

/// Whether a product matches a lowercased free-text query.
///
/// The query matches if any one of name, description, or a tag contains
/// it as a substring.
fn matches_query(product: &Product, query_lower: &str) -> bool {
    product.name.to_lowercase().contains(query_lower)
        || product.description.to_lowercase().contains(query_lower)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query_lower))
}

/// Apply a filter/sort configuration to a product list.
#[must_use]
pub fn apply(products: &[Product], filter: &CatalogFilter) -> Vec<Product> {
    let query_lower = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| {
            query_lower
                .as_deref()
                .is_none_or(|q| matches_query(product, q))
        })
        .filter(|product| {
            filter
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
        })
        .filter(|product| filter.stock.is_none_or(|status| status.matches(product)))
        .cloned()
        .collect();

    match filter.sort {
        SortKey::Newest => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceLow => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Popular => filtered.sort_by(|a, b| b.stock.cmp(&a.stock)),
    }

    filtered
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use raritone_core::{Price, ProductId};

    use super::*;

    fn product(id: &str, name: &str, cents: i64, stock: u32, age_days: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Price::from_cents(cents),
            image_url: String::new(),
            back_image_url: None,
            category: "Tops".into(),
            stock,
            tags: vec!["minimal".into()],
            sizes: None,
            colors: None,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Luxury Tee", 696_00, 10, 3),
            product("2", "Bold Jacket", 1043_13, 5, 2),
            product("3", "Evening Dress", 399_20, 8, 1),
            product("4", "Signature Hoodie", 434_13, 0, 0),
        ]
    }

    #[test]
    fn query_matches_name_description_or_tag() {
        let products = catalog();

        let by_name = apply(
            &products,
            &CatalogFilter {
                query: Some("jacket".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id.as_str(), "2");

        // Every description contains "description"
        let by_description = apply(
            &products,
            &CatalogFilter {
                query: Some("DESCRIPTION".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_description.len(), 4);

        let by_tag = apply(
            &products,
            &CatalogFilter {
                query: Some("minimal".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_tag.len(), 4);
    }

    #[test]
    fn stock_partitions_are_disjoint_and_cover() {
        let products = catalog();

        let in_stock = apply(
            &products,
            &CatalogFilter {
                stock: Some(StockStatus::InStock),
                ..Default::default()
            },
        );
        let out_of_stock = apply(
            &products,
            &CatalogFilter {
                stock: Some(StockStatus::OutOfStock),
                ..Default::default()
            },
        );

        assert!(in_stock.iter().all(|p| p.stock > 0));
        assert!(out_of_stock.iter().all(|p| p.stock == 0));
        assert_eq!(in_stock.len() + out_of_stock.len(), products.len());
        for p in &in_stock {
            assert!(out_of_stock.iter().all(|q| q.id != p.id));
        }
    }

    #[test]
    fn out_of_stock_filter_selects_exactly_the_sold_out_product() {
        let products = vec![
            product("a", "In", 100, 10, 0),
            product("b", "Out", 100, 0, 0),
        ];
        let result = apply(
            &products,
            &CatalogFilter {
                stock: Some(StockStatus::OutOfStock),
                ..Default::default()
            },
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "b");
    }

    #[test]
    fn price_sorts_are_reverses_of_each_other() {
        let products = catalog();

        let ascending = apply(
            &products,
            &CatalogFilter {
                sort: SortKey::PriceLow,
                ..Default::default()
            },
        );
        let mut descending = apply(
            &products,
            &CatalogFilter {
                sort: SortKey::PriceHigh,
                ..Default::default()
            },
        );

        descending.reverse();
        let asc_ids: Vec<_> = ascending.iter().map(|p| p.id.clone()).collect();
        let desc_ids: Vec<_> = descending.iter().map(|p| p.id.clone()).collect();
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn newest_sort_puts_most_recent_first() {
        let products = catalog();
        let result = apply(&products, &CatalogFilter::default());
        assert_eq!(result[0].id.as_str(), "4");
        assert_eq!(result[3].id.as_str(), "1");
    }

    #[test]
    fn popular_sort_ranks_by_stock_descending() {
        let products = catalog();
        let result = apply(
            &products,
            &CatalogFilter {
                sort: SortKey::Popular,
                ..Default::default()
            },
        );
        let stocks: Vec<_> = result.iter().map(|p| p.stock).collect();
        assert_eq!(stocks, vec![10, 8, 5, 0]);
    }

    #[test]
    fn blank_query_means_no_filtering() {
        let products = catalog();
        let result = apply(
            &products,
            &CatalogFilter {
                query: Some("   ".into()),
                ..Default::default()
            },
        );
        assert_eq!(result.len(), products.len());
    }

    #[test]
    fn sort_key_parse_defaults_to_newest() {
        assert_eq!(SortKey::parse("priceLow"), SortKey::PriceLow);
        assert_eq!(SortKey::parse("priceHigh"), SortKey::PriceHigh);
        assert_eq!(SortKey::parse("popular"), SortKey::Popular);
        assert_eq!(SortKey::parse("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse("bogus"), SortKey::Newest);
    }
}
