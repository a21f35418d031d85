//! Product and category catalog

use crate::error::{not_found_error, AppError};
use crate::models::{
    Category, CategoryFilter, CategoryInput, Featured, Page, Product, ProductFilter, ProductInput,
    ProductStatus,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::validation::{validate, ValidationError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_FEATURED_LIMIT: i64 = 8;
pub const MAX_FEATURED_LIMIT: i64 = 24;

const PRODUCT_RULES: &[(&str, &str)] = &[
    ("slug", "required|string|slug|max:191"),
    ("name", "required|string|max:255"),
    ("description", "string|max:10000"),
    ("price", "required|numeric|min:0"),
    ("status", "string|in:DRAFT,PUBLISHED,ARCHIVED"),
    ("categoryId", "uuid"),
    ("isFeatured", "boolean"),
];

const CATEGORY_RULES: &[(&str, &str)] = &[
    ("slug", "required|string|slug|max:191"),
    ("name", "required|string|max:255"),
    ("description", "string|max:10000"),
    ("isActive", "boolean"),
    ("isFeatured", "boolean"),
    ("sortOrder", "integer|min:0|max:100000"),
];

pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { products, categories }
    }

    /// Published featured products and active featured categories
    pub async fn featured(&self, limit: Option<i64>) -> Result<Featured, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_FEATURED_LIMIT)
            .clamp(1, MAX_FEATURED_LIMIT);

        let products = self
            .products
            .list(&ProductFilter {
                status: Some(ProductStatus::Published),
                featured_only: true,
                page: Page::new(Some(limit), None),
                ..Default::default()
            })
            .await?;

        let categories = self
            .categories
            .list(&CategoryFilter {
                active_only: true,
                featured_only: true,
                limit: Some(limit),
            })
            .await?;

        debug!(
            "Featured selection: {} products, {} categories",
            products.len(),
            categories.len()
        );
        Ok(Featured { products, categories })
    }

    pub async fn published_products(&self, category: Option<String>, page: Page) -> Result<Vec<Product>, AppError> {
        self.products
            .list(&ProductFilter {
                status: Some(ProductStatus::Published),
                category_slug: category,
                featured_only: false,
                page,
            })
            .await
    }

    /// A published product by slug; drafts and archived products are hidden
    pub async fn published_product(&self, slug: &str) -> Result<Product, AppError> {
        self.products
            .find_by_slug(slug)
            .await?
            .filter(|p| p.status == ProductStatus::Published)
            .ok_or_else(|| not_found_error(format!("Product '{}' not found", slug)))
    }

    pub async fn active_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories
            .list(&CategoryFilter {
                active_only: true,
                ..Default::default()
            })
            .await
    }

    // ---- admin: products --------------------------------------------------

    pub async fn list_products(&self, status: Option<ProductStatus>, page: Page) -> Result<Vec<Product>, AppError> {
        self.products
            .list(&ProductFilter {
                status,
                page,
                ..Default::default()
            })
            .await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find(id)
            .await?
            .ok_or_else(|| not_found_error(format!("Product '{}' not found", id)))
    }

    pub async fn create_product(&self, payload: &Value) -> Result<Product, AppError> {
        let input = self.product_input(payload).await?;
        let product = self.products.insert(&input).await?;
        info!("Product {} created", product.slug);
        Ok(product)
    }

    /// Replace every field of an existing product
    pub async fn update_product(&self, id: Uuid, payload: &Value) -> Result<Product, AppError> {
        let input = self.product_input(payload).await?;
        let product = self
            .products
            .update(id, &input)
            .await?
            .ok_or_else(|| not_found_error(format!("Product '{}' not found", id)))?;
        info!("Product {} updated", product.slug);
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(not_found_error(format!("Product '{}' not found", id)));
        }
        info!("Product {} deleted", id);
        Ok(())
    }

    async fn product_input(&self, payload: &Value) -> Result<ProductInput, AppError> {
        let input: ProductInput = validate(payload, PRODUCT_RULES)?.into_typed()?;

        if let Some(category_id) = input.category_id {
            if self.categories.find(category_id).await?.is_none() {
                return Err(ValidationError::new(
                    "categoryId",
                    "exists",
                    "The selected categoryId is invalid.",
                )
                .into());
            }
        }
        Ok(input)
    }

    // ---- admin: categories ------------------------------------------------

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list(&CategoryFilter::default()).await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, AppError> {
        self.categories
            .find(id)
            .await?
            .ok_or_else(|| not_found_error(format!("Category '{}' not found", id)))
    }

    pub async fn create_category(&self, payload: &Value) -> Result<Category, AppError> {
        let input: CategoryInput = validate(payload, CATEGORY_RULES)?.into_typed()?;
        let category = self.categories.insert(&input).await?;
        info!("Category {} created", category.slug);
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, payload: &Value) -> Result<Category, AppError> {
        let input: CategoryInput = validate(payload, CATEGORY_RULES)?.into_typed()?;
        let category = self
            .categories
            .update(id, &input)
            .await?
            .ok_or_else(|| not_found_error(format!("Category '{}' not found", id)))?;
        info!("Category {} updated", category.slug);
        Ok(category)
    }

    /// Products in the category are kept and become uncategorized
    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        if !self.categories.delete(id).await? {
            return Err(not_found_error(format!("Category '{}' not found", id)));
        }
        info!("Category {} deleted", id);
        Ok(())
    }
}
