use crate::db::MeasurementRecord;

use super::MeasurementStore;

impl MeasurementStore {
    /// Appends a record and returns its id. Same path as `save`: a record
    /// with id 0 gets a fresh id, so readings never overwrite each other.
    pub fn save_record(&self, record: MeasurementRecord) -> u64 {
        self.insert_new(record)
    }

    /// All records from one sensor, oldest first.
    pub fn get_history(&self, sensor_id: u32) -> Vec<MeasurementRecord> {
        self.find(|record| record.sensor_id == sensor_id)
    }

    pub fn by_event(&self, event_type: &str) -> Vec<MeasurementRecord> {
        self.find(|record| record.event_type == event_type)
    }

    pub fn by_session(&self, session_id: &str) -> Vec<MeasurementRecord> {
        self.find(|record| record.session_id.as_deref() == Some(session_id))
    }
}
