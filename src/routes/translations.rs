//! Translation and language handlers

use super::extract::{check_query, ApiJson, ApiQuery};
use crate::error::AppError;
use crate::models::{LanguageBody, LanguageListBody, SuccessResponse, TranslationQuery, TranslationsBody};
use crate::state::SharedState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

const LANG_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// GET /api/translations?lang=&namespace=
pub async fn get_translations(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<TranslationQuery>,
) -> Result<Json<SuccessResponse<TranslationsBody>>, AppError> {
    check_query(&query)?;
    let (language, translations) = state
        .translations
        .lookup(query.lang.as_deref(), query.namespace.as_deref())
        .await?;

    Ok(Json(SuccessResponse::with_data(
        "Translations retrieved",
        TranslationsBody {
            language: language.code,
            translations,
        },
    )))
}

/// GET /api/languages
pub async fn list_languages(
    State(state): State<SharedState>,
) -> Result<Json<SuccessResponse<LanguageListBody>>, AppError> {
    let languages = state.translations.languages().await?;
    Ok(Json(SuccessResponse::with_data(
        "Languages retrieved",
        LanguageListBody { languages },
    )))
}

/// POST /api/languages/current
///
/// Remembers the visitor's language in a `lang` cookie.
pub async fn set_current_language(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Response, AppError> {
    let language = state.translations.select(&payload).await?;
    let cookie = format!(
        "lang={}; Path=/; Max-Age={}; SameSite=Lax",
        language.code, LANG_COOKIE_MAX_AGE
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SuccessResponse::with_data("Language updated", LanguageBody { language })),
    )
        .into_response())
}
