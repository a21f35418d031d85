//! PostgreSQL language and translation repository

use super::queries::{SELECT_DEFAULT_LANGUAGE, SELECT_LANGUAGE, SELECT_LANGUAGES, SELECT_TRANSLATIONS};
use crate::error::AppError;
use crate::models::{Language, TranslationEntry};
use crate::repository::TranslationRepository;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

pub struct PgTranslationRepository {
    pool: Pool,
}

impl PgTranslationRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn language_from_row(row: &Row) -> Result<Language, AppError> {
        Ok(Language {
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            is_default: row.try_get("is_default")?,
        })
    }
}

#[async_trait]
impl TranslationRepository for PgTranslationRepository {
    async fn find_language(&self, code: &str) -> Result<Option<Language>, AppError> {
        let client = self.pool.get().await?;
        client
            .query_opt(SELECT_LANGUAGE, &[&code])
            .await?
            .as_ref()
            .map(Self::language_from_row)
            .transpose()
    }

    async fn default_language(&self) -> Result<Option<Language>, AppError> {
        let client = self.pool.get().await?;
        client
            .query_opt(SELECT_DEFAULT_LANGUAGE, &[])
            .await?
            .as_ref()
            .map(Self::language_from_row)
            .transpose()
    }

    async fn list_languages(&self, active_only: bool) -> Result<Vec<Language>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(SELECT_LANGUAGES, &[&active_only]).await?;
        rows.iter().map(Self::language_from_row).collect()
    }

    async fn entries(&self, language: &str, namespace: Option<&str>) -> Result<Vec<TranslationEntry>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(SELECT_TRANSLATIONS, &[&language, &namespace]).await?;

        rows.iter()
            .map(|row| {
                Ok(TranslationEntry {
                    language_code: row.try_get("language_code")?,
                    namespace: row.try_get("namespace")?,
                    key: row.try_get("key")?,
                    value: row.try_get("value")?,
                })
            })
            .collect()
    }
}
