//! Table bootstrap
//!
//! Creates the tables the service needs if they don't exist yet and seeds
//! the default language and the bootstrap administrator.

use crate::auth::hash_password;
use crate::config::AdminBootstrap;
use crate::error::AppError;
use crate::repository::AdminUserRepository;
use deadpool_postgres::Pool;
use tracing::{info, warn};

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS admin_users (
        id UUID PRIMARY KEY,
        email VARCHAR(255) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        name VARCHAR(255),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id UUID PRIMARY KEY,
        slug VARCHAR(191) UNIQUE NOT NULL,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        is_featured BOOLEAN NOT NULL DEFAULT false,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        slug VARCHAR(191) UNIQUE NOT NULL,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        status VARCHAR(16) NOT NULL DEFAULT 'DRAFT',
        category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
        is_featured BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS quote_requests (
        id UUID PRIMARY KEY,
        reference VARCHAR(16) UNIQUE NOT NULL,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(64),
        company VARCHAR(255),
        message TEXT,
        status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
        admin_notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS quote_request_items (
        id UUID PRIMARY KEY,
        quote_id UUID NOT NULL REFERENCES quote_requests(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        product_id UUID REFERENCES products(id) ON DELETE SET NULL,
        product_name VARCHAR(255) NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        notes TEXT
    )",
    "CREATE TABLE IF NOT EXISTS newsletter_subscribers (
        id UUID PRIMARY KEY,
        email VARCHAR(255) UNIQUE NOT NULL,
        name VARCHAR(255),
        source VARCHAR(64) NOT NULL DEFAULT 'website',
        is_subscribed BOOLEAN NOT NULL DEFAULT true,
        subscribed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        unsubscribed_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS languages (
        code VARCHAR(10) PRIMARY KEY,
        name VARCHAR(64) NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT true,
        is_default BOOLEAN NOT NULL DEFAULT false
    )",
    "CREATE TABLE IF NOT EXISTS translations (
        language_code VARCHAR(10) NOT NULL REFERENCES languages(code) ON DELETE CASCADE,
        namespace VARCHAR(64) NOT NULL DEFAULT 'common',
        key VARCHAR(191) NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (language_code, namespace, key)
    )",
    "CREATE TABLE IF NOT EXISTS site_options (
        key VARCHAR(191) PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_products_status ON products(status)",
    "CREATE INDEX IF NOT EXISTS idx_products_category_id ON products(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_quote_requests_status ON quote_requests(status, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_quote_request_items_quote_id ON quote_request_items(quote_id)",
];

/// Create database tables if they don't exist
pub async fn create_tables(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;

    for statement in TABLES {
        client.execute(*statement, &[]).await?;
    }

    for statement in INDEXES {
        if let Err(e) = client.execute(*statement, &[]).await {
            warn!("Could not create index: {}", e);
        }
    }

    client
        .execute(
            "INSERT INTO languages (code, name, is_active, is_default)
             VALUES ('en', 'English', true, true)
             ON CONFLICT (code) DO NOTHING",
            &[],
        )
        .await?;

    info!("Database tables initialized");
    Ok(())
}

/// Create the bootstrap administrator when configured and missing
pub async fn seed_admin(
    admins: &dyn AdminUserRepository,
    bootstrap: Option<&AdminBootstrap>,
) -> Result<(), AppError> {
    let Some(bootstrap) = bootstrap else {
        return Ok(());
    };

    let email = bootstrap.email.trim().to_lowercase();
    if admins.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let hash = hash_password(&bootstrap.password)?;
    admins.insert(&email, &hash, Some("Administrator")).await?;
    info!("Bootstrap administrator '{}' created", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryAdmins;

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let admins = MemoryAdmins::default();
        let bootstrap = AdminBootstrap {
            email: " Owner@Example.com ".to_string(),
            password: "correct horse".to_string(),
        };

        seed_admin(&admins, Some(&bootstrap)).await.unwrap();
        let first = admins.find_by_email("owner@example.com").await.unwrap().unwrap();

        seed_admin(&admins, Some(&bootstrap)).await.unwrap();
        let second = admins.find_by_email("owner@example.com").await.unwrap().unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_seed_admin_without_bootstrap_does_nothing() {
        let admins = MemoryAdmins::default();
        seed_admin(&admins, None).await.unwrap();
        assert!(admins.find_by_email("owner@example.com").await.unwrap().is_none());
    }
}
