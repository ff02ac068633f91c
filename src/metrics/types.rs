use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundMetrics {
    pub timestamp: DateTime<Utc>,
    pub session_id: Option<String>,
    pub level_id: Option<i64>,
    pub records_written: usize,
    pub duration_us: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub recent_rounds: Vec<RoundMetrics>,
    pub round_count: u64,
    pub records_written: u64,
    /// Collection attempts refused because no session was active.
    pub rejected_count: u64,
}
