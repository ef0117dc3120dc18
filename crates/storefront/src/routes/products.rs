//! Product route handlers.
//!
//! The catalog is small enough to filter in-process: the full listing
//! is cached once and every request applies its filter to the cached
//! list. Filters combine with AND; an empty result set is a normal
//! response, not an error.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use raritone_core::{Product, ProductId, StockStatus};

use crate::catalog::{self, CatalogFilter, SortKey};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// Free-text search.
    pub q: Option<String>,
    /// Exact category label.
    pub category: Option<String>,
    /// `inStock` or `outOfStock`; anything else means no filter.
    pub stock_status: Option<String>,
    /// `newest`, `priceLow`, `priceHigh`, or `popular`.
    pub sort_by: Option<String>,
}

impl ListingQuery {
    fn into_filter(self) -> CatalogFilter {
        CatalogFilter {
            query: self.q,
            category: self.category,
            stock: self.stock_status.as_deref().and_then(StockStatus::parse),
            sort: self.sort_by.as_deref().map(SortKey::parse).unwrap_or_default(),
        }
    }
}

/// Load the full product list, via the listing cache.
async fn load_products(state: &AppState) -> Result<Arc<Vec<Product>>> {
    let state = state.clone();
    state
        .product_cache()
        .try_get_with((), async {
            let products = ProductRepository::new(state.pool()).list().await?;
            Ok(Arc::new(products))
        })
        .await
        .map_err(|error: Arc<crate::db::RepositoryError>| {
            AppError::Internal(format!("catalog load failed: {error}"))
        })
}

/// Product listing with filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Value>> {
    let products = load_products(&state).await?;
    let filter = query.into_filter();
    let filtered = catalog::apply(&products, &filter);

    Ok(Json(json!({
        "products": filtered,
        "total": filtered.len(),
        "sortBy": filter.sort.as_str(),
    })))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(&ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product".into()))?;

    Ok(Json(product))
}
