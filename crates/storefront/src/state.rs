//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use raritone_core::Product;

use crate::config::StorefrontConfig;
use crate::scan::{PgScanSink, ScanService};
use crate::services::identity::{IdentityClient, IdentityError};

/// How long the catalog listing stays cached.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    identity: IdentityClient,
    product_cache: Cache<(), Arc<Vec<Product>>>,
    scan: Arc<ScanService<PgScanSink>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the identity client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, IdentityError> {
        let identity = IdentityClient::new(&config.identity)?;
        let scan = Arc::new(ScanService::new(PgScanSink::new(pool.clone())));

        let product_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                identity,
                product_cache,
                scan,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the identity provider client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// The catalog cache. A single entry holding the full product list;
    /// catalog filtering happens in-process on the cached list.
    #[must_use]
    pub fn product_cache(&self) -> &Cache<(), Arc<Vec<Product>>> {
        &self.inner.product_cache
    }

    /// Get a reference to the scan capture service.
    #[must_use]
    pub fn scan(&self) -> &Arc<ScanService<PgScanSink>> {
        &self.inner.scan
    }
}
