//! Quote request handlers

use super::extract::{check_query, ApiJson, ApiPath, ApiQuery};
use crate::error::AppError;
use crate::models::{
    MessageResponse, QuoteBody, QuoteFilter, QuoteListBody, QuoteListQuery, QuoteReceipt,
    QuoteReceiptBody, SuccessResponse,
};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use uuid::Uuid;

/// POST /api/quotes
pub async fn submit_quote(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<SuccessResponse<QuoteReceiptBody>>), AppError> {
    let quote = state.quotes.submit(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Quote request submitted",
            QuoteReceiptBody {
                quote: QuoteReceipt::from(&quote),
            },
        )),
    ))
}

/// POST /api/admin/quotes
///
/// Records a quote taken over the phone or by email.
pub async fn create_quote(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<SuccessResponse<QuoteBody>>), AppError> {
    let quote = state.quotes.submit(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Quote created", QuoteBody { quote })),
    ))
}

/// GET /api/admin/quotes
pub async fn list_quotes(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<QuoteListQuery>,
) -> Result<Json<SuccessResponse<QuoteListBody>>, AppError> {
    check_query(&query)?;
    let (quotes, total) = state.quote_admin.list(&QuoteFilter::from(&query)).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} quotes", total),
        QuoteListBody { quotes, total },
    )))
}

/// GET /api/admin/quotes/{id}
pub async fn get_quote(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse<QuoteBody>>, AppError> {
    let quote = state.quote_admin.get(id).await?;
    Ok(Json(SuccessResponse::with_data("Quote retrieved", QuoteBody { quote })))
}

/// PUT /api/admin/quotes/{id}
pub async fn update_quote(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<QuoteBody>>, AppError> {
    let quote = state.quote_admin.update(id, &payload).await?;
    Ok(Json(SuccessResponse::with_data("Quote updated", QuoteBody { quote })))
}

/// DELETE /api/admin/quotes/{id}
pub async fn delete_quote(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.quote_admin.delete(id).await?;
    Ok(Json(MessageResponse::new("Quote deleted")))
}
