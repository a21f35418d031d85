//! PostgreSQL product and category repositories

use super::parse_column;
use super::queries::{
    CATEGORY_COLUMNS, DELETE_CATEGORY, DELETE_PRODUCT, INSERT_CATEGORY, INSERT_PRODUCT,
    PRODUCT_COLUMNS, UPDATE_CATEGORY, UPDATE_PRODUCT,
};
use crate::error::{map_unique_violation, AppError};
use crate::models::{Category, CategoryFilter, CategoryInput, Product, ProductFilter, ProductInput};
use crate::repository::{CategoryRepository, ProductRepository};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracing::debug;
use uuid::Uuid;

pub struct PgProductRepository {
    pool: Pool,
}

impl PgProductRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn from_row(row: &Row) -> Result<Product, AppError> {
        Ok(Product {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            status: parse_column(row, "status")?,
            category_id: row.try_get("category_id")?,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn find_where(&self, column: &str, value: &(dyn ToSql + Sync)) -> Result<Option<Product>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM products p WHERE p.{} = $1", PRODUCT_COLUMNS, column);
        client
            .query_opt(sql.as_str(), &[value])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let client = self.pool.get().await?;

        let status = filter.status.map(|s| s.as_str());
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(status) = &status {
            params.push(status);
            conditions.push(format!("p.status = ${}", params.len()));
        }
        if let Some(slug) = &filter.category_slug {
            params.push(slug);
            conditions.push(format!("c.slug = ${}", params.len()));
        }
        if filter.featured_only {
            conditions.push("p.is_featured".to_string());
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        params.push(&filter.page.limit);
        let limit_idx = params.len();
        params.push(&filter.page.offset);
        let offset_idx = params.len();

        let sql = format!(
            "SELECT {} FROM products p LEFT JOIN categories c ON c.id = p.category_id {} \
             ORDER BY p.created_at DESC, p.name LIMIT ${} OFFSET ${}",
            PRODUCT_COLUMNS, clause, limit_idx, offset_idx
        );

        let rows = client.query(sql.as_str(), &params).await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        self.find_where("id", &id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError> {
        self.find_where("slug", &slug).await
    }

    async fn insert(&self, input: &ProductInput) -> Result<Product, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                INSERT_PRODUCT,
                &[
                    &Uuid::new_v4(),
                    &input.slug,
                    &input.name,
                    &input.description,
                    &input.price,
                    &input.status.as_str(),
                    &input.category_id,
                    &input.is_featured,
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, format!("Product slug '{}' is already taken", input.slug)))?;

        let product = Self::from_row(&row)?;
        debug!("Created product {} ({})", product.slug, product.id);
        Ok(product)
    }

    async fn update(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                UPDATE_PRODUCT,
                &[
                    &id,
                    &input.slug,
                    &input.name,
                    &input.description,
                    &input.price,
                    &input.status.as_str(),
                    &input.category_id,
                    &input.is_featured,
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, format!("Product slug '{}' is already taken", input.slug)))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client.execute(DELETE_PRODUCT, &[&id]).await?;
        Ok(deleted > 0)
    }
}

pub struct PgCategoryRepository {
    pool: Pool,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn from_row(row: &Row) -> Result<Category, AppError> {
        Ok(Category {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            sort_order: row.try_get("sort_order")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, AppError> {
        let client = self.pool.get().await?;

        let mut conditions: Vec<&str> = Vec::new();
        if filter.active_only {
            conditions.push("is_active");
        }
        if filter.featured_only {
            conditions.push("is_featured");
        }

        let mut sql = format!("SELECT {} FROM categories", CATEGORY_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY sort_order, name");

        let rows = match &filter.limit {
            Some(limit) => {
                sql.push_str(" LIMIT $1");
                client.query(sql.as_str(), &[limit]).await?
            }
            None => client.query(sql.as_str(), &[]).await?,
        };

        rows.iter().map(Self::from_row).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        client
            .query_opt(sql.as_str(), &[&id])
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    async fn insert(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                INSERT_CATEGORY,
                &[
                    &Uuid::new_v4(),
                    &input.slug,
                    &input.name,
                    &input.description,
                    &input.is_active,
                    &input.is_featured,
                    &input.sort_order,
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, format!("Category slug '{}' is already taken", input.slug)))?;

        let category = Self::from_row(&row)?;
        debug!("Created category {} ({})", category.slug, category.id);
        Ok(category)
    }

    async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                UPDATE_CATEGORY,
                &[
                    &id,
                    &input.slug,
                    &input.name,
                    &input.description,
                    &input.is_active,
                    &input.is_featured,
                    &input.sort_order,
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, format!("Category slug '{}' is already taken", input.slug)))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client.execute(DELETE_CATEGORY, &[&id]).await?;
        Ok(deleted > 0)
    }
}
