//! Quote request models
//!
//! A quote request is submitted publicly with contact details and one or
//! more requested items, then moved through `PENDING -> REVIEWED -> CLOSED`
//! by an administrator.

use super::Page;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const REFERENCE_LEN: usize = 8;

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Reviewed,
    Closed,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 3] = [QuoteStatus::Pending, QuoteStatus::Reviewed, QuoteStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "PENDING",
            QuoteStatus::Reviewed => "REVIEWED",
            QuoteStatus::Closed => "CLOSED",
        }
    }

    /// Forward-only transitions. Staying in the same state is allowed.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Reviewed)
                | (Pending, Closed)
                | (Reviewed, Reviewed)
                | (Reviewed, Closed)
                | (Closed, Closed)
        )
    }

    /// States a quote may be in when it moves to `next`
    pub fn predecessors(next: QuoteStatus) -> Vec<QuoteStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| s.can_transition_to(next))
            .collect()
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(QuoteStatus::Pending),
            "REVIEWED" => Ok(QuoteStatus::Reviewed),
            "CLOSED" => Ok(QuoteStatus::Closed),
            other => Err(format!("unknown quote status '{}'", other)),
        }
    }
}

/// A stored quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub admin_notes: Option<String>,
    pub items: Vec<QuoteItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Build a new `PENDING` quote with a fresh id and reference
    pub fn new(contact: QuoteContact, items: Vec<QuoteItemInput>) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Self {
            id,
            reference: generate_reference(),
            name: contact.name,
            email: contact.email.to_lowercase(),
            phone: contact.phone,
            company: contact.company,
            message: contact.message,
            status: QuoteStatus::Pending,
            admin_notes: None,
            items: items
                .into_iter()
                .map(|item| QuoteItem {
                    id: Uuid::new_v4(),
                    quote_id: id,
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    notes: item.notes,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One requested line on a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Contact block of a validated submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

/// A validated requested item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemInput {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Validated admin changes to a quote
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteChanges {
    pub status: Option<QuoteStatus>,
    pub admin_notes: Option<String>,
    /// Set when the payload sends `adminNotes` as null or blank
    #[serde(skip)]
    pub clear_admin_notes: bool,
}

/// Query string for the admin quote list
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListQuery {
    pub status: Option<QuoteStatus>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Repository-level filter for listing quotes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuoteFilter {
    pub status: Option<QuoteStatus>,
    pub page: Page,
}

impl From<&QuoteListQuery> for QuoteFilter {
    fn from(query: &QuoteListQuery) -> Self {
        Self {
            status: query.status,
            page: Page::new(query.limit, query.offset),
        }
    }
}

/// Envelope payload for a single quote
#[derive(Debug, Serialize)]
pub struct QuoteBody {
    pub quote: Quote,
}

/// Envelope payload for a quote listing
#[derive(Debug, Serialize)]
pub struct QuoteListBody {
    pub quotes: Vec<Quote>,
    pub total: i64,
}

/// Public acknowledgement returned after submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReceipt {
    pub id: Uuid,
    pub reference: String,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Quote> for QuoteReceipt {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id,
            reference: quote.reference.clone(),
            status: quote.status,
            created_at: quote.created_at,
        }
    }
}

/// Envelope payload for a public submission
#[derive(Debug, Serialize)]
pub struct QuoteReceiptBody {
    pub quote: QuoteReceipt,
}

/// Human-friendly reference such as `QR-7KD2M9XP`
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    let code: String = (0..REFERENCE_LEN)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();
    format!("QR-{}", code)
}
