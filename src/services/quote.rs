//! Quote request submission and lifecycle

use crate::error::{not_found_error, AppError};
use crate::models::{Quote, QuoteChanges, QuoteContact, QuoteFilter, QuoteItemInput, QuoteStatus};
use crate::repository::{ProductRepository, QuoteRepository};
use crate::validation::{validate, RuleSet, ValidationError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SUBMISSION_RULES: &[(&str, &str)] = &[
    ("name", "required|string|max:255"),
    ("email", "required|string|email|max:255"),
    ("phone", "string|max:64"),
    ("company", "string|max:255"),
    ("message", "string|max:5000"),
    ("items", "required|array|min:1|max:50"),
];

const ITEM_RULES: &[(&str, &str)] = &[
    ("productId", "uuid"),
    ("productName", "required|string|max:255"),
    ("quantity", "required|integer|min:1|max:100000"),
    ("notes", "string|max:1000"),
];

const UPDATE_RULES: &[(&str, &str)] = &[
    ("status", "string|in:PENDING,REVIEWED,CLOSED"),
    ("adminNotes", "string|max:5000"),
];

/// Public quote submission
pub struct QuoteService {
    repo: Arc<dyn QuoteRepository>,
    products: Arc<dyn ProductRepository>,
}

impl QuoteService {
    pub fn new(repo: Arc<dyn QuoteRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { repo, products }
    }

    /// Validate and store a new quote request
    pub async fn submit(&self, payload: &Value) -> Result<Quote, AppError> {
        let (contact, items) = parse_submission(payload)?;
        self.check_products(&items).await?;
        let quote = Quote::new(contact, items);

        let stored = self.repo.insert(&quote).await?;
        info!(
            "Quote {} submitted by {} ({} items)",
            stored.reference,
            stored.email,
            stored.items.len()
        );
        Ok(stored)
    }

    /// Every referenced product must exist
    async fn check_products(&self, items: &[QuoteItemInput]) -> Result<(), AppError> {
        for (index, item) in items.iter().enumerate() {
            let Some(product_id) = item.product_id else {
                continue;
            };
            if self.products.find(product_id).await?.is_none() {
                return Err(ValidationError::new(
                    format!("items.{}.productId", index),
                    "exists",
                    "The selected productId is invalid.",
                )
                .into());
            }
        }
        Ok(())
    }
}

/// Validate the contact block and every item. Item errors are reported as
/// `items.<index>.<field>`.
fn parse_submission(payload: &Value) -> Result<(QuoteContact, Vec<QuoteItemInput>), AppError> {
    let validated = validate(payload, SUBMISSION_RULES)?;
    let item_rules = RuleSet::parse(ITEM_RULES).map_err(|e| AppError::Internal(e.to_string()))?;

    let mut items = Vec::new();
    if let Some(Value::Array(raw_items)) = validated.get("items") {
        for (index, raw) in raw_items.iter().enumerate() {
            let item = item_rules
                .validate(raw)
                .map_err(|e| e.nested(&format!("items.{}", index)))?;
            items.push(item.into_typed::<QuoteItemInput>()?);
        }
    }

    let contact = validated.into_typed::<QuoteContact>()?;
    Ok((contact, items))
}

/// Administrative access to stored quotes
pub struct QuoteAdminService {
    repo: Arc<dyn QuoteRepository>,
}

impl QuoteAdminService {
    pub fn new(repo: Arc<dyn QuoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        let (quotes, total) = self.repo.list(filter).await?;
        debug!("Listed {} of {} quotes", quotes.len(), total);
        Ok((quotes, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Quote, AppError> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| not_found_error(format!("Quote '{}' not found", id)))
    }

    /// Change status and/or notes. Status may only move forward. A null or
    /// blank `adminNotes` clears the notes.
    pub async fn update(&self, id: Uuid, payload: &Value) -> Result<Quote, AppError> {
        let validated = validate(payload, UPDATE_RULES)?;
        let clear_notes = payload.get("adminNotes").is_some() && validated.get("adminNotes").is_none();
        if validated.is_empty() && !clear_notes {
            return Err(ValidationError::new(
                "status",
                "required_without",
                "The status field is required when adminNotes is not present.",
            )
            .into());
        }
        let mut changes: QuoteChanges = validated.into_typed()?;
        changes.clear_admin_notes = clear_notes;

        let current = self.get(id).await?;
        let from = match changes.status {
            Some(next) => {
                if !current.status.can_transition_to(next) {
                    return Err(transition_error(current.status, next));
                }
                QuoteStatus::predecessors(next)
            }
            None => QuoteStatus::ALL.to_vec(),
        };

        let Some(updated) = self.repo.update(id, &changes, &from).await? else {
            // Deleted or moved on by another request since it was read
            let latest = self.get(id).await?;
            warn!("Quote {} changed to {} during update", id, latest.status);
            return Err(transition_error(latest.status, changes.status.unwrap_or(latest.status)));
        };
        info!("Quote {} updated (status {})", updated.reference, updated.status);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(not_found_error(format!("Quote '{}' not found", id)));
        }
        info!("Quote {} deleted", id);
        Ok(())
    }
}

fn transition_error(from: QuoteStatus, to: QuoteStatus) -> AppError {
    ValidationError::new(
        "status",
        "transition",
        format!("A quote cannot move from {} to {}.", from, to),
    )
    .into()
}
