//! Scan record repository.
//!
//! Scan records are append-only: written once when a capture window
//! completes, listed newest-first for the scan-history view, never
//! mutated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use raritone_core::{DeviceClass, ScanRecord, ScanRecordId, UserId};

use super::RepositoryError;

/// Repository for scan records.
pub struct ScanRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ScanRow {
    id: String,
    account_id: String,
    scan_id: String,
    height: Option<Decimal>,
    weight: Option<Decimal>,
    image_url: Option<String>,
    scan_time: DateTime<Utc>,
    device: String,
    try_on_count: i32,
}

impl ScanRow {
    fn into_record(self) -> Result<ScanRecord, RepositoryError> {
        let device = self.device.parse::<DeviceClass>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid device class in database: {e}"))
        })?;

        Ok(ScanRecord {
            id: ScanRecordId::new(self.id),
            user_id: UserId::new(self.account_id),
            scan_id: self.scan_id,
            height: self.height,
            weight: self.weight,
            image_url: self.image_url,
            scan_time: self.scan_time,
            device,
            try_on_count: u32::try_from(self.try_on_count).unwrap_or(0),
        })
    }
}

impl<'a> ScanRepository<'a> {
    /// Create a new scan repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a scan record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, record: &ScanRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.scan
                (id, account_id, scan_id, height, weight, image_url,
                 scan_time, device, try_on_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(record.id.as_str())
        .bind(record.user_id.as_str())
        .bind(&record.scan_id)
        .bind(record.height)
        .bind(record.weight)
        .bind(record.image_url.as_deref())
        .bind(record.scan_time)
        .bind(record.device.as_str())
        .bind(i32::try_from(record.try_on_count).unwrap_or(0))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List an account's scans, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored device class is
    /// unknown.
    pub async fn list_for_account(
        &self,
        id: &UserId,
    ) -> Result<Vec<ScanRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r"
            SELECT id, account_id, scan_id, height, weight, image_url,
                   scan_time, device, try_on_count
            FROM storefront.scan
            WHERE account_id = $1
            ORDER BY scan_time DESC
            ",
        )
        .bind(id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ScanRow::into_record).collect()
    }
}
