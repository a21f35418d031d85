//! Newsletter subscriber models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SOURCE: &str = "website";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub source: String,
    pub is_subscribed: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

/// Validated subscribe payload
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
}

/// What `subscribe` did with the address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    Resubscribed,
    AlreadySubscribed,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberListQuery {
    pub subscribed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
    pub subscriber: Subscriber,
    pub already_subscribed: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriberBody {
    pub subscriber: Subscriber,
}

#[derive(Debug, Serialize)]
pub struct SubscriberListBody {
    pub subscribers: Vec<Subscriber>,
}
