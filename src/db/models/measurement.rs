//! Measurement record data model.
//!
//! One record is written per sensor per collection round. Records are never
//! mutated after they are stored; old ones can only be dropped by age.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Entity, Timestamped};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Assigned by the store on save while zero; records are append-only.
    pub id: u64,
    /// Collection session that produced the record, if any.
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub sensor_id: u32,
    pub value: f64,
    pub event_type: String,
}

impl MeasurementRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        sensor_id: u32,
        value: f64,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            session_id: None,
            timestamp,
            sensor_id,
            value,
            event_type: event_type.into(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl Entity for MeasurementRecord {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn needs_id(&self) -> bool {
        self.id == 0
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Timestamped for MeasurementRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
