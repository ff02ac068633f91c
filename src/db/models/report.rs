//! Report data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Entity, Timestamped};

/// Human-readable rendering of a forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub summary: String,
    pub content: String,
}

impl Report {
    /// Tags the content with the requested format. No conversion happens;
    /// the body is passed through verbatim after the tag.
    pub fn export(&self, fmt: &str) -> String {
        format!("[FORMAT={fmt}] {}", self.content)
    }
}

impl Entity for Report {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Timestamped for Report {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}
