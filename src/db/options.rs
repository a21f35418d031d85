//! PostgreSQL site option repository

use super::queries::{SELECT_OPTIONS, UPSERT_OPTION};
use crate::error::AppError;
use crate::models::SiteOption;
use crate::repository::SiteOptionRepository;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

pub struct PgSiteOptionRepository {
    pool: Pool,
}

impl PgSiteOptionRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn from_row(row: &Row) -> Result<SiteOption, AppError> {
        Ok(SiteOption {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl SiteOptionRepository for PgSiteOptionRepository {
    async fn list(&self) -> Result<Vec<SiteOption>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(SELECT_OPTIONS, &[]).await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<SiteOption, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_one(UPSERT_OPTION, &[&key, &value]).await?;
        Self::from_row(&row)
    }
}
