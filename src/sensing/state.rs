use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CollectionStatus {
    #[default]
    Idle,
    Collecting,
}

/// Collection session state: idle until sensors are initialised, then
/// collecting until `finish` is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionState {
    pub status: CollectionStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Rounds collected since the session began.
    pub rounds: u32,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collecting(&self) -> bool {
        self.status == CollectionStatus::Collecting
    }

    pub fn begin_session(&mut self, session_id: String, started_at: DateTime<Utc>) {
        *self = Self {
            status: CollectionStatus::Collecting,
            session_id: Some(session_id),
            started_at: Some(started_at),
            rounds: 0,
        };
    }

    pub fn record_round(&mut self) {
        self.rounds = self.rounds.saturating_add(1);
    }

    /// Back to idle from any state.
    pub fn finish(&mut self) {
        *self = Self::default();
    }
}
