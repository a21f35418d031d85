//! Request extractors that reject with the API error envelope

use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};
use validator::Validate;

/// JSON body; malformed input becomes a 400 envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed input becomes a 400 envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters; malformed input becomes a 400 envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Apply `validator` constraints on query structs
pub fn check_query<T: Validate>(query: &T) -> Result<(), AppError> {
    query
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid query parameters: {}", e)))
}
