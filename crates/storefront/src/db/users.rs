//! Account repository.
//!
//! One row per identity-provider account, plus the per-line cart rows.
//! Cart writes are per-line upserts keyed (account, product, size) so two
//! devices adding concurrently both land, instead of the whole-array
//! replacement the original storefront did (which lost updates).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use raritone_core::{
    Cart, CartItem, Email, LineKey, Price, ProductId, RecentSearches, ScanSnapshot, UserId,
};

use super::RepositoryError;
use crate::models::user::Account;

/// Repository for account and cart database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    name: String,
    email: String,
    profile_image: Option<String>,
    recent_searches: Vec<String>,
    scan_height: Option<Decimal>,
    scan_weight: Option<Decimal>,
    scan_image_url: Option<String>,
    scan_recorded_at: Option<DateTime<Utc>>,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let scan_snapshot = self.scan_recorded_at.map(|_| ScanSnapshot {
            height: self.scan_height,
            weight: self.scan_weight,
            image_url: self.scan_image_url,
        });

        Ok(Account {
            id: UserId::new(self.id),
            name: self.name,
            email,
            profile_image: self.profile_image,
            recent_searches: RecentSearches::from_terms(self.recent_searches),
            scan_snapshot,
            is_admin: self.is_admin,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    product_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i32,
    size: String,
    image_url: String,
}

impl CartLineRow {
    fn into_item(self) -> CartItem {
        CartItem {
            product_id: ProductId::new(self.product_id),
            name: self.name,
            unit_price: Price::from_cents(self.unit_price_cents),
            quantity: u32::try_from(self.quantity).unwrap_or(0),
            size: size_from_db(self.size),
            image_url: self.image_url,
        }
    }
}

/// Sizes are stored as `''` for "no size" so they can take part in the
/// (account, product, size) primary key.
fn size_to_db(size: Option<&str>) -> &str {
    size.unwrap_or("")
}

fn size_from_db(size: String) -> Option<String> {
    if size.is_empty() { None } else { Some(size) }
}

impl<'a> UserRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its provider-issued ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: &UserId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, name, email, profile_image, recent_searches,
                   scan_height, scan_weight, scan_image_url, scan_recorded_at,
                   is_admin, created_at
            FROM storefront.account
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Ensure an account row exists for a freshly signed-in identity,
    /// creating it with empty defaults if missing.
    ///
    /// Existing rows are left untouched; the provider's profile fields are
    /// only applied at first creation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or read-back fails.
    pub async fn create_if_absent(
        &self,
        id: &UserId,
        name: &str,
        email: &Email,
        profile_image: Option<&str>,
    ) -> Result<Account, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.account (id, name, email, profile_image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(id.as_str())
        .bind(name)
        .bind(email.as_str())
        .bind(profile_image)
        .execute(self.pool)
        .await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    // =========================================================================
    // Cart lines
    // =========================================================================

    /// Load the account's cart, oldest line first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart(&self, id: &UserId) -> Result<Cart, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT product_id, name, unit_price_cents, quantity, size, image_url
            FROM storefront.cart_item
            WHERE account_id = $1
            ORDER BY added_at ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(Cart::from_items(
            rows.into_iter().map(CartLineRow::into_item).collect(),
        ))
    }

    /// Add a line to the account's cart. If the (product, size) line
    /// already exists the quantities are added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert_cart_line(
        &self,
        id: &UserId,
        item: &CartItem,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.cart_item
                (account_id, product_id, size, name, unit_price_cents, quantity, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (account_id, product_id, size)
            DO UPDATE SET quantity = storefront.cart_item.quantity + EXCLUDED.quantity
            ",
        )
        .bind(id.as_str())
        .bind(item.product_id.as_str())
        .bind(size_to_db(item.size.as_deref()))
        .bind(&item.name)
        .bind(item.unit_price.cents())
        .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
        .bind(&item.image_url)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Replace the quantity of an existing cart line. Setting quantity on
    /// an absent line is a no-op, matching the in-memory cart semantics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_cart_line_quantity(
        &self,
        id: &UserId,
        key: &LineKey,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE storefront.cart_item
            SET quantity = $4
            WHERE account_id = $1 AND product_id = $2 AND size = $3
            ",
        )
        .bind(id.as_str())
        .bind(key.product_id.as_str())
        .bind(size_to_db(key.size.as_deref()))
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a cart line. Removing an absent line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_cart_line(
        &self,
        id: &UserId,
        key: &LineKey,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM storefront.cart_item
            WHERE account_id = $1 AND product_id = $2 AND size = $3
            ",
        )
        .bind(id.as_str())
        .bind(key.product_id.as_str())
        .bind(size_to_db(key.size.as_deref()))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Profile fields
    // =========================================================================

    /// Replace the account's recent-search list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    pub async fn update_recent_searches(
        &self,
        id: &UserId,
        searches: &RecentSearches,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.account
            SET recent_searches = $2
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .bind(searches.terms())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
