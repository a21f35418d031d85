//! PostgreSQL newsletter subscriber repository

use super::queries::{DELETE_SUBSCRIBER, INSERT_SUBSCRIBER, SET_SUBSCRIBED, SUBSCRIBER_COLUMNS};
use crate::error::{map_unique_violation, AppError};
use crate::models::Subscriber;
use crate::repository::NewsletterRepository;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

pub struct PgNewsletterRepository {
    pool: Pool,
}

impl PgNewsletterRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn from_row(row: &Row) -> Result<Subscriber, AppError> {
        Ok(Subscriber {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            source: row.try_get("source")?,
            is_subscribed: row.try_get("is_subscribed")?,
            subscribed_at: row.try_get("subscribed_at")?,
            unsubscribed_at: row.try_get("unsubscribed_at")?,
        })
    }
}

#[async_trait]
impl NewsletterRepository for PgNewsletterRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM newsletter_subscribers WHERE email = $1", SUBSCRIBER_COLUMNS);
        client
            .query_opt(sql.as_str(), &[&email])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn insert(&self, email: &str, name: Option<&str>, source: &str) -> Result<Subscriber, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(INSERT_SUBSCRIBER, &[&Uuid::new_v4(), &email, &name, &source])
            .await
            .map_err(|e| map_unique_violation(e, format!("'{}' is already on the list", email)))?;
        Self::from_row(&row)
    }

    async fn set_subscribed(&self, id: Uuid, subscribed: bool) -> Result<Option<Subscriber>, AppError> {
        let client = self.pool.get().await?;
        client
            .query_opt(SET_SUBSCRIBED, &[&id, &subscribed])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn list(&self, subscribed: Option<bool>) -> Result<Vec<Subscriber>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM newsletter_subscribers \
             WHERE ($1::BOOLEAN IS NULL OR is_subscribed = $1) \
             ORDER BY subscribed_at DESC",
            SUBSCRIBER_COLUMNS
        );
        let rows = client.query(sql.as_str(), &[&subscribed]).await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client.execute(DELETE_SUBSCRIBER, &[&id]).await?;
        Ok(deleted > 0)
    }
}
