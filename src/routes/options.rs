//! Site option handlers

use super::extract::{ApiJson, ApiPath};
use crate::error::AppError;
use crate::models::{SiteOptionBody, SiteOptionListBody, SuccessResponse};
use crate::state::SharedState;
use crate::validation::{validate, ValidationError};
use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

const OPTION_RULES: &[(&str, &str)] = &[("value", "required|string|max:10000")];
const MAX_KEY_LEN: usize = 191;

/// GET /api/options
pub async fn list_options(
    State(state): State<SharedState>,
) -> Result<Json<SuccessResponse<SiteOptionListBody>>, AppError> {
    let options = state.options.list().await?;
    Ok(Json(SuccessResponse::with_data(
        "Options retrieved",
        SiteOptionListBody { options },
    )))
}

/// PUT /api/admin/options/{key}
pub async fn put_option(
    State(state): State<SharedState>,
    ApiPath(key): ApiPath<String>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<SiteOptionBody>>, AppError> {
    let key = key.trim();
    if key.is_empty() || key.chars().count() > MAX_KEY_LEN {
        return Err(ValidationError::new(
            "key",
            "max",
            format!("The key field must be between 1 and {} characters.", MAX_KEY_LEN),
        )
        .into());
    }

    let validated = validate(&payload, OPTION_RULES)?;
    let value = validated.str("value").unwrap_or_default();

    let option = state.options.upsert(key, value).await?;
    info!("Site option '{}' updated", option.key);
    Ok(Json(SuccessResponse::with_data("Option saved", SiteOptionBody { option })))
}
