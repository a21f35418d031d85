//! Interface translations and language selection

use crate::error::{not_found_error, AppError};
use crate::models::{Language, TranslationMap};
use crate::repository::TranslationRepository;
use crate::validation::validate;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const SELECT_RULES: &[(&str, &str)] = &[("language", "required|string|max:10")];

pub struct TranslationService {
    repo: Arc<dyn TranslationRepository>,
}

impl TranslationService {
    pub fn new(repo: Arc<dyn TranslationRepository>) -> Self {
        Self { repo }
    }

    /// Strings for `lang` (or the default language) grouped by namespace
    pub async fn lookup(&self, lang: Option<&str>, namespace: Option<&str>) -> Result<(Language, TranslationMap), AppError> {
        let language = match lang {
            Some(code) => self.ensure_active(code).await?,
            None => self
                .repo
                .default_language()
                .await?
                .ok_or_else(|| not_found_error("No default language is configured"))?,
        };

        let mut translations = TranslationMap::new();
        for entry in self.repo.entries(&language.code, namespace).await? {
            translations
                .entry(entry.namespace)
                .or_default()
                .insert(entry.key, entry.value);
        }

        debug!(
            "Loaded {} namespaces for language {}",
            translations.len(),
            language.code
        );
        Ok((language, translations))
    }

    pub async fn languages(&self) -> Result<Vec<Language>, AppError> {
        self.repo.list_languages(true).await
    }

    /// The language for `code` if it exists and is active
    pub async fn ensure_active(&self, code: &str) -> Result<Language, AppError> {
        let code = code.trim().to_lowercase();
        self.repo
            .find_language(&code)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| not_found_error(format!("Language '{}' is not available", code)))
    }

    /// Validate a `{"language": code}` payload and resolve the language
    pub async fn select(&self, payload: &Value) -> Result<Language, AppError> {
        let validated = validate(payload, SELECT_RULES)?;
        let code = validated.str("language").unwrap_or_default();
        self.ensure_active(code).await
    }
}
