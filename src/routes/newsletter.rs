//! Newsletter handlers

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::AppError;
use crate::models::{
    MessageResponse, SubscribeBody, SubscribeOutcome, SubscriberBody, SubscriberListBody,
    SubscriberListQuery, SuccessResponse,
};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use uuid::Uuid;

/// POST /api/newsletter/subscribe
///
/// 201 for a new address, 200 when it was already known.
pub async fn subscribe(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<SuccessResponse<SubscribeBody>>), AppError> {
    let (subscriber, outcome) = state.newsletter.subscribe(&payload).await?;

    let (status, message) = match outcome {
        SubscribeOutcome::Created => (StatusCode::CREATED, "Subscribed to the newsletter"),
        SubscribeOutcome::Resubscribed => (StatusCode::OK, "Welcome back to the newsletter"),
        SubscribeOutcome::AlreadySubscribed => (StatusCode::OK, "Already subscribed to the newsletter"),
    };

    Ok((
        status,
        Json(SuccessResponse::with_data(
            message,
            SubscribeBody {
                subscriber,
                already_subscribed: outcome == SubscribeOutcome::AlreadySubscribed,
            },
        )),
    ))
}

/// POST /api/newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<SubscriberBody>>, AppError> {
    let subscriber = state.newsletter.unsubscribe(&payload).await?;
    Ok(Json(SuccessResponse::with_data(
        "Unsubscribed from the newsletter",
        SubscriberBody { subscriber },
    )))
}

/// GET /api/admin/newsletter/subscribers
pub async fn list_subscribers(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<SubscriberListQuery>,
) -> Result<Json<SuccessResponse<SubscriberListBody>>, AppError> {
    let subscribers = state.newsletter.list(query.subscribed).await?;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} subscribers", subscribers.len()),
        SubscriberListBody { subscribers },
    )))
}

/// DELETE /api/admin/newsletter/subscribers/{id}
pub async fn delete_subscriber(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.newsletter.delete(id).await?;
    Ok(Json(MessageResponse::new("Subscriber deleted")))
}
