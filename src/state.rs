//! Application state management
//!
//! Contains shared state accessible across all handlers. Services own trait
//! objects so the router can run against PostgreSQL or in-memory stores.

use crate::auth::JwtKeys;
use crate::db::{
    PgAdminUserRepository, PgCategoryRepository, PgNewsletterRepository, PgProductRepository,
    PgQuoteRepository, PgSiteOptionRepository, PgTranslationRepository,
};
use crate::repository::{
    AdminUserRepository, CategoryRepository, NewsletterRepository, ProductRepository,
    QuoteRepository, SiteOptionRepository, TranslationRepository,
};
use crate::services::{
    CatalogService, NewsletterService, QuoteAdminService, QuoteService, TranslationService,
};
use deadpool_postgres::Pool;
use std::sync::Arc;

/// One implementation per repository trait
pub struct Repositories {
    pub quotes: Arc<dyn QuoteRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub subscribers: Arc<dyn NewsletterRepository>,
    pub translations: Arc<dyn TranslationRepository>,
    pub options: Arc<dyn SiteOptionRepository>,
    pub admins: Arc<dyn AdminUserRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: Pool) -> Self {
        Self {
            quotes: Arc::new(PgQuoteRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            subscribers: Arc::new(PgNewsletterRepository::new(pool.clone())),
            translations: Arc::new(PgTranslationRepository::new(pool.clone())),
            options: Arc::new(PgSiteOptionRepository::new(pool.clone())),
            admins: Arc::new(PgAdminUserRepository::new(pool)),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub quotes: QuoteService,
    pub quote_admin: QuoteAdminService,
    pub catalog: CatalogService,
    pub newsletter: NewsletterService,
    pub translations: TranslationService,
    pub options: Arc<dyn SiteOptionRepository>,
    pub admins: Arc<dyn AdminUserRepository>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(repos: Repositories, jwt: JwtKeys) -> Self {
        Self {
            quotes: QuoteService::new(repos.quotes.clone(), repos.products.clone()),
            quote_admin: QuoteAdminService::new(repos.quotes),
            catalog: CatalogService::new(repos.products, repos.categories),
            newsletter: NewsletterService::new(repos.subscribers),
            translations: TranslationService::new(repos.translations),
            options: repos.options,
            admins: repos.admins,
            jwt,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
