//! Newsletter subscriptions

use crate::error::{not_found_error, AppError};
use crate::models::{SubscribeOutcome, SubscribeRequest, Subscriber, DEFAULT_SOURCE};
use crate::repository::NewsletterRepository;
use crate::validation::validate;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const SUBSCRIBE_RULES: &[(&str, &str)] = &[
    ("email", "required|string|email|max:255"),
    ("name", "string|max:255"),
    ("source", "string|max:64"),
];

const UNSUBSCRIBE_RULES: &[(&str, &str)] = &[("email", "required|string|email|max:255")];

pub struct NewsletterService {
    repo: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    pub fn new(repo: Arc<dyn NewsletterRepository>) -> Self {
        Self { repo }
    }

    /// Add an address, or reactivate it if it unsubscribed earlier
    pub async fn subscribe(&self, payload: &Value) -> Result<(Subscriber, SubscribeOutcome), AppError> {
        let request: SubscribeRequest = validate(payload, SUBSCRIBE_RULES)?.into_typed()?;
        let email = request.email.to_lowercase();

        match self.repo.find_by_email(&email).await? {
            None => {
                let source = request.source.as_deref().unwrap_or(DEFAULT_SOURCE);
                let subscriber = self
                    .repo
                    .insert(&email, request.name.as_deref(), source)
                    .await?;
                info!("New newsletter subscriber {} (source: {})", email, source);
                Ok((subscriber, SubscribeOutcome::Created))
            }
            Some(existing) if existing.is_subscribed => Ok((existing, SubscribeOutcome::AlreadySubscribed)),
            Some(existing) => {
                let subscriber = self
                    .repo
                    .set_subscribed(existing.id, true)
                    .await?
                    .ok_or_else(|| not_found_error(format!("Subscriber '{}' not found", email)))?;
                info!("Newsletter subscriber {} resubscribed", email);
                Ok((subscriber, SubscribeOutcome::Resubscribed))
            }
        }
    }

    /// Soft delete: the address is kept but marked unsubscribed
    pub async fn unsubscribe(&self, payload: &Value) -> Result<Subscriber, AppError> {
        let validated = validate(payload, UNSUBSCRIBE_RULES)?;
        let email = validated.str("email").unwrap_or_default().to_lowercase();

        let existing = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| not_found_error(format!("Subscriber '{}' not found", email)))?;
        if !existing.is_subscribed {
            return Ok(existing);
        }

        let subscriber = self
            .repo
            .set_subscribed(existing.id, false)
            .await?
            .ok_or_else(|| not_found_error(format!("Subscriber '{}' not found", email)))?;
        info!("Newsletter subscriber {} unsubscribed", email);
        Ok(subscriber)
    }

    pub async fn list(&self, subscribed: Option<bool>) -> Result<Vec<Subscriber>, AppError> {
        self.repo.list(subscribed).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(not_found_error(format!("Subscriber '{}' not found", id)));
        }
        info!("Newsletter subscriber {} deleted", id);
        Ok(())
    }
}
