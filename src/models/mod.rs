//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

pub mod admin;
pub mod catalog;
pub mod newsletter;
pub mod quote;
pub mod site_option;
pub mod translation;

// Re-export commonly used types
pub use admin::*;
pub use catalog::*;
pub use newsletter::*;
pub use quote::*;
pub use site_option::*;
pub use translation::*;

use serde::Serialize;

/// Generic success envelope: `{"status":"success","message":..., ...data}`
///
/// `T` must serialize as a map since its fields are flattened into the envelope.
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Message-only response (no data)
#[derive(Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

/// Pagination bounds shared by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
