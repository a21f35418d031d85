//! Administrator login

use super::extract::ApiJson;
use crate::auth::{verify_password, Claims, TokenBody};
use crate::error::AppError;
use crate::models::{AdminBody, LoginRequest, SuccessResponse};
use crate::state::SharedState;
use crate::validation::validate;
use axum::{extract::State, Extension, Json};
use serde_json::Value;
use tracing::{info, warn};

const LOGIN_RULES: &[(&str, &str)] = &[
    ("email", "required|string|email|max:255"),
    ("password", "required|string|max:255"),
];

/// POST /api/admin/auth/login
pub async fn login(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<TokenBody>>, AppError> {
    let req: LoginRequest = validate(&payload, LOGIN_RULES)?.into_typed()?;
    let email = req.email.to_lowercase();

    let Some(admin) = state.admins.find_by_email(&email).await? else {
        warn!("Failed admin login for {}", email);
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    };

    // Verify password
    if !verify_password(&req.password, &admin.password_hash)? {
        warn!("Failed admin login for {}", email);
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = state.jwt.create_token(admin.id, &admin.email)?;
    info!("Admin {} logged in", admin.email);

    Ok(Json(SuccessResponse::with_data(
        "Login successful",
        TokenBody {
            token,
            token_type: "Bearer",
            expires_in: state.jwt.ttl_seconds(),
            admin,
        },
    )))
}

/// GET /api/admin/auth/me
pub async fn me(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SuccessResponse<AdminBody>>, AppError> {
    let admin = state
        .admins
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown administrator".to_string()))?;

    Ok(Json(SuccessResponse::with_data("Authenticated", AdminBody { admin })))
}
