//! Admin guard middleware
//!
//! Validates the bearer token and makes the [`Claims`] available to handlers
//! through request extensions.

use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::debug;

pub async fn admin_guard(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Unauthorized("Missing or malformed authorization header".to_string()))?;

    let claims = state.jwt.decode_token(bearer.token())?;

    // Tokens outlive deleted accounts
    if state.admins.find_by_id(claims.sub).await?.is_none() {
        return Err(AppError::Unauthorized("Unknown administrator".to_string()));
    }

    debug!("Admin {} authorized for {}", claims.email, request.uri().path());
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
