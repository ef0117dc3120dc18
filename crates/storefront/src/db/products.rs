//! Product repository.
//!
//! The `product` table is the single source of truth for the catalog. It
//! is written by the CLI seeder and by administrative tooling elsewhere;
//! the storefront only reads it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use raritone_core::{Price, Product, ProductId};

use super::RepositoryError;

/// Repository for catalog reads (and the seeder's writes).
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    image_url: String,
    back_image_url: Option<String>,
    category: String,
    stock: i32,
    tags: Vec<String>,
    sizes: Option<Vec<String>>,
    colors: Option<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: Price::from_cents(self.price_cents),
            image_url: self.image_url,
            back_image_url: self.back_image_url,
            category: self.category,
            stock: u32::try_from(self.stock).unwrap_or(0),
            tags: self.tags,
            sizes: self.sizes,
            colors: self.colors,
            created_at: self.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, image_url, back_image_url, \
                               category, stock, tags, sizes, colors, created_at";

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    /// Insert or replace a product. Used by the CLI seeder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.product
                (id, name, description, price_cents, image_url, back_image_url,
                 category, stock, tags, sizes, colors, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                price_cents = EXCLUDED.price_cents,
                image_url = EXCLUDED.image_url,
                back_image_url = EXCLUDED.back_image_url,
                category = EXCLUDED.category,
                stock = EXCLUDED.stock,
                tags = EXCLUDED.tags,
                sizes = EXCLUDED.sizes,
                colors = EXCLUDED.colors
            ",
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(&product.image_url)
        .bind(product.back_image_url.as_deref())
        .bind(&product.category)
        .bind(i32::try_from(product.stock).unwrap_or(i32::MAX))
        .bind(&product.tags)
        .bind(product.sizes.as_deref())
        .bind(product.colors.as_deref())
        .bind(product.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
