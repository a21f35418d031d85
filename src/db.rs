//! Database connection management
//!
//! Builds the PostgreSQL connection pool owned by `main` and hosts the
//! repository implementations that run parameterized SQL against it.

pub mod admins;
pub mod catalog;
pub mod newsletter;
pub mod options;
pub mod queries;
pub mod quotes;
pub mod schema;
pub mod translations;

pub use admins::PgAdminUserRepository;
pub use catalog::{PgCategoryRepository, PgProductRepository};
pub use newsletter::PgNewsletterRepository;
pub use options::PgSiteOptionRepository;
pub use quotes::PgQuoteRepository;
pub use translations::PgTranslationRepository;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use std::str::FromStr;
use tokio_postgres::{NoTls, Row};
use tracing::info;

/// Create a connection pool and verify it with a trivial query
pub async fn connect(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let pool = create_pool(config)?;

    let client = pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;
    drop(client);

    info!(
        "Database pool established ({}:{}/{}, TLS: {})",
        config.host, config.port, config.database, config.require_tls
    );
    Ok(pool)
}

/// Create a connection pool with given configuration
fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.max_pool_size));

    if config.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
    }
}

/// Read a text column holding an enum value
pub(crate) fn parse_column<T>(row: &Row, column: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .map_err(|e| AppError::Internal(format!("Corrupt value in column '{}': {}", column, e)))
}
