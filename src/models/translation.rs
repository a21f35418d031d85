//! Languages and translation strings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub is_default: bool,
}

/// One `(language, namespace, key) -> value` row
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationEntry {
    pub language_code: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
}

/// `namespace -> key -> value`
pub type TranslationMap = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TranslationQuery {
    #[validate(length(min = 2, max = 10, message = "lang must be between 2 and 10 characters"))]
    pub lang: Option<String>,
    #[validate(length(min = 1, max = 64, message = "namespace must be between 1 and 64 characters"))]
    pub namespace: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslationsBody {
    pub language: String,
    pub translations: TranslationMap,
}

#[derive(Debug, Serialize)]
pub struct LanguageBody {
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct LanguageListBody {
    pub languages: Vec<Language>,
}
