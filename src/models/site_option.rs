//! Site-wide key/value options (SEO title, contact email, ...)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOption {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SiteOptionBody {
    pub option: SiteOption,
}

#[derive(Debug, Serialize)]
pub struct SiteOptionListBody {
    pub options: Vec<SiteOption>,
}
