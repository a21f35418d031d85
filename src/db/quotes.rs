//! PostgreSQL quote repository

use super::parse_column;
use super::queries::{
    DELETE_QUOTE, INSERT_QUOTE, INSERT_QUOTE_ITEM, QUOTE_COLUMNS, SELECT_QUOTE_ITEMS, UPDATE_QUOTE,
};
use crate::error::{map_missing_reference, AppError};
use crate::models::{Quote, QuoteChanges, QuoteFilter, QuoteItem, QuoteStatus};
use crate::repository::QuoteRepository;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use postgres_types::ToSql;
use std::collections::HashMap;
use tokio_postgres::{Client, Row};
use tracing::debug;
use uuid::Uuid;

pub struct PgQuoteRepository {
    pool: Pool,
}

impl PgQuoteRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn quote_from_row(row: &Row) -> Result<Quote, AppError> {
        Ok(Quote {
            id: row.try_get("id")?,
            reference: row.try_get("reference")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            company: row.try_get("company")?,
            message: row.try_get("message")?,
            status: parse_column(row, "status")?,
            admin_notes: row.try_get("admin_notes")?,
            items: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn item_from_row(row: &Row) -> Result<QuoteItem, AppError> {
        Ok(QuoteItem {
            id: row.try_get("id")?,
            quote_id: row.try_get("quote_id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            notes: row.try_get("notes")?,
        })
    }

    /// Load and attach items for the given quotes
    async fn attach_items(client: &Client, quotes: &mut [Quote]) -> Result<(), AppError> {
        if quotes.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = quotes.iter().map(|q| q.id).collect();
        let rows = client.query(SELECT_QUOTE_ITEMS, &[&ids]).await?;

        let mut by_quote: HashMap<Uuid, Vec<QuoteItem>> = HashMap::new();
        for row in &rows {
            let item = Self::item_from_row(row)?;
            by_quote.entry(item.quote_id).or_default().push(item);
        }

        for quote in quotes.iter_mut() {
            quote.items = by_quote.remove(&quote.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn fetch(client: &Client, id: Uuid) -> Result<Option<Quote>, AppError> {
        let sql = format!("SELECT {} FROM quote_requests WHERE id = $1", QUOTE_COLUMNS);
        let Some(row) = client.query_opt(sql.as_str(), &[&id]).await? else {
            return Ok(None);
        };

        let mut quotes = vec![Self::quote_from_row(&row)?];
        Self::attach_items(client, &mut quotes).await?;
        Ok(quotes.pop())
    }
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn insert(&self, quote: &Quote) -> Result<Quote, AppError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        tx.execute(
            INSERT_QUOTE,
            &[
                &quote.id,
                &quote.reference,
                &quote.name,
                &quote.email,
                &quote.phone,
                &quote.company,
                &quote.message,
                &quote.status.as_str(),
                &quote.admin_notes,
                &quote.created_at,
                &quote.updated_at,
            ],
        )
        .await?;

        for (position, item) in quote.items.iter().enumerate() {
            let position = position as i32;
            tx.execute(
                INSERT_QUOTE_ITEM,
                &[
                    &item.id,
                    &quote.id,
                    &position,
                    &item.product_id,
                    &item.product_name,
                    &item.quantity,
                    &item.notes,
                ],
            )
            .await
            .map_err(|e| map_missing_reference(e, format!("items.{}.productId", position)))?;
        }

        tx.commit().await?;
        debug!("Stored quote {} with {} items", quote.reference, quote.items.len());

        Ok(quote.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let client = self.pool.get().await?;
        Self::fetch(&**client, id).await
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        let client = self.pool.get().await?;

        let status = filter.status.map(|s| s.as_str());
        let mut clause = String::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        if let Some(status) = &status {
            params.push(status);
            clause = format!("WHERE status = ${}", params.len());
        }

        let count_sql = format!("SELECT COUNT(*) FROM quote_requests {}", clause);
        let total: i64 = client.query_one(count_sql.as_str(), &params).await?.try_get(0)?;

        params.push(&filter.page.limit);
        let limit_idx = params.len();
        params.push(&filter.page.offset);
        let offset_idx = params.len();

        let sql = format!(
            "SELECT {} FROM quote_requests {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            QUOTE_COLUMNS, clause, limit_idx, offset_idx
        );
        let rows = client.query(sql.as_str(), &params).await?;

        let mut quotes = rows
            .iter()
            .map(Self::quote_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Self::attach_items(&**client, &mut quotes).await?;

        Ok((quotes, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &QuoteChanges,
        from: &[QuoteStatus],
    ) -> Result<Option<Quote>, AppError> {
        let client = self.pool.get().await?;

        let status = changes.status.map(|s| s.as_str());
        let from: Vec<&str> = from.iter().map(|s| s.as_str()).collect();
        let updated = client
            .execute(
                UPDATE_QUOTE,
                &[&id, &status, &changes.admin_notes, &changes.clear_admin_notes, &from],
            )
            .await?;
        if updated == 0 {
            return Ok(None);
        }

        Self::fetch(&**client, id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client.execute(DELETE_QUOTE, &[&id]).await?;
        Ok(deleted > 0)
    }
}
