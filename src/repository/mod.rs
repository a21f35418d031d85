//! Data-access traits, one per entity
//!
//! Services depend on these traits rather than on PostgreSQL directly. The
//! production implementations live in `crate::db`; `memory` provides
//! in-process stores for tests.

#[cfg(test)]
pub mod memory;

use crate::error::AppError;
use crate::models::{
    AdminUser, Category, CategoryFilter, CategoryInput, Language, Product, ProductFilter,
    ProductInput, Quote, QuoteChanges, QuoteFilter, QuoteStatus, SiteOption, Subscriber, TranslationEntry,
};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Persist a quote together with its items
    async fn insert(&self, quote: &Quote) -> Result<Quote, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError>;

    /// Newest first, with the total count ignoring pagination
    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError>;

    /// Apply changes only while the quote's status is one of `from`; `None`
    /// when the quote does not exist or has since moved to another status
    async fn update(
        &self,
        id: Uuid,
        changes: &QuoteChanges,
        from: &[QuoteStatus],
    ) -> Result<Option<Quote>, AppError>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, AppError>;
    async fn insert(&self, input: &ProductInput) -> Result<Product, AppError>;
    async fn update(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>, AppError>;
    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn insert(&self, input: &CategoryInput) -> Result<Category, AppError>;
    async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, AppError>;
    async fn insert(&self, email: &str, name: Option<&str>, source: &str) -> Result<Subscriber, AppError>;
    async fn set_subscribed(&self, id: Uuid, subscribed: bool) -> Result<Option<Subscriber>, AppError>;
    async fn list(&self, subscribed: Option<bool>) -> Result<Vec<Subscriber>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError>;
    async fn default_language(&self) -> Result<Option<Language>, AppError>;
    async fn list_languages(&self, active_only: bool) -> Result<Vec<Language>, AppError>;
    async fn entries(&self, language: &str, namespace: Option<&str>) -> Result<Vec<TranslationEntry>, AppError>;
}

#[async_trait]
pub trait SiteOptionRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<SiteOption>, AppError>;
    async fn upsert(&self, key: &str, value: &str) -> Result<SiteOption, AppError>;
}

#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError>;
    async fn insert(&self, email: &str, password_hash: &str, name: Option<&str>) -> Result<AdminUser, AppError>;
}
