//! Sensor data model.
//!
//! Sensors are simulated: `value` is a plain field that the drift step (or a
//! test) rewrites between collection rounds. A device-backed deployment
//! would swap the body of `read_value` and nothing else.

use serde::{Deserialize, Serialize};

use crate::db::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub unit: String,
    pub poll_frequency_secs: u32,
    #[serde(default)]
    pub value: f64,
}

impl Sensor {
    pub fn new(
        id: u32,
        kind: impl Into<String>,
        unit: impl Into<String>,
        poll_frequency_secs: u32,
        value: f64,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            unit: unit.into(),
            poll_frequency_secs,
            value,
        }
    }

    pub fn read_value(&self) -> f64 {
        self.value
    }
}

impl Entity for Sensor {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}
