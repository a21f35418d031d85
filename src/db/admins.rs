//! PostgreSQL administrator repository

use super::queries::{INSERT_ADMIN, SELECT_ADMIN_BY_EMAIL, SELECT_ADMIN_BY_ID};
use crate::error::{map_unique_violation, AppError};
use crate::models::AdminUser;
use crate::repository::AdminUserRepository;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

pub struct PgAdminUserRepository {
    pool: Pool,
}

impl PgAdminUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn from_row(row: &Row) -> Result<AdminUser, AppError> {
        Ok(AdminUser {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl AdminUserRepository for PgAdminUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError> {
        let client = self.pool.get().await?;
        client
            .query_opt(SELECT_ADMIN_BY_EMAIL, &[&email])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError> {
        let client = self.pool.get().await?;
        client
            .query_opt(SELECT_ADMIN_BY_ID, &[&id])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn insert(&self, email: &str, password_hash: &str, name: Option<&str>) -> Result<AdminUser, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(INSERT_ADMIN, &[&Uuid::new_v4(), &email, &password_hash, &name])
            .await
            .map_err(|e| map_unique_violation(e, "Admin user already exists"))?;
        Self::from_row(&row)
    }
}
