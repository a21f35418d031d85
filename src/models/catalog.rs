//! Catalog models: products and categories

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Product publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Published => "PUBLISHED",
            ProductStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ProductStatus::Draft),
            "PUBLISHED" => Ok(ProductStatus::Published),
            "ARCHIVED" => Ok(ProductStatus::Archived),
            other => Err(format!("unknown product status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: ProductStatus,
    pub category_id: Option<Uuid>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated product fields for create/replace
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub status: ProductStatus,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Validated category fields for create/replace
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

/// Repository-level product filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub status: Option<ProductStatus>,
    pub category_slug: Option<String>,
    pub featured_only: bool,
    pub page: Page,
}

/// Repository-level category filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryFilter {
    pub active_only: bool,
    pub featured_only: bool,
    pub limit: Option<i64>,
}

/// Public product listing query
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    #[validate(length(min = 1, max = 191, message = "category must be between 1 and 191 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Admin product listing query
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductListQuery {
    pub status: Option<ProductStatus>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Featured selection query
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FeaturedQuery {
    #[validate(range(min = 1, max = 24, message = "limit must be between 1 and 24"))]
    pub limit: Option<i64>,
}

/// Featured products and categories for landing pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Featured {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct ProductBody {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductListBody {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoryBody {
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoryListBody {
    pub categories: Vec<Category>,
}
