use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        models::event_tag,
        repositories::{MeasurementStore, SensorStore},
        MeasurementRecord, Repository,
    },
    journal::Journal,
    metrics::{MetricsCollector, RoundMetrics},
    utils::lock,
};

use super::state::CollectionState;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Result of a `collect` call.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CollectOutcome {
    /// One record per registered sensor was appended.
    Collected { records: usize },
    /// Sensors were not initialised; nothing was written.
    NotCollecting,
}

impl CollectOutcome {
    pub fn records(&self) -> usize {
        match self {
            CollectOutcome::Collected { records } => *records,
            CollectOutcome::NotCollecting => 0,
        }
    }
}

/// Reads every registered sensor and appends the readings to the
/// measurement store, but only between `initialize_sensors` and
/// `finish_collection`.
#[derive(Clone)]
pub struct DataCollectionController {
    sensors: SensorStore,
    measurements: MeasurementStore,
    journal: Journal,
    metrics: MetricsCollector,
    state: Arc<Mutex<CollectionState>>,
}

impl DataCollectionController {
    pub fn new(
        sensors: SensorStore,
        measurements: MeasurementStore,
        journal: Journal,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            sensors,
            measurements,
            journal,
            metrics,
            state: Arc::new(Mutex::new(CollectionState::new())),
        }
    }

    pub fn state(&self) -> CollectionState {
        lock(&self.state).clone()
    }

    pub fn is_collecting(&self) -> bool {
        lock(&self.state).is_collecting()
    }

    /// Moves to the collecting state. A fresh session id is minted when
    /// coming from idle; an active session is kept as is.
    pub fn initialize_sensors(&self) {
        let mut state = lock(&self.state);
        if state.is_collecting() {
            log_info!(
                "sensors already initialised for session {:?}",
                state.session_id
            );
        } else {
            state.begin_session(Uuid::new_v4().to_string(), Utc::now());
        }
        drop(state);

        self.journal.info(format!(
            "Sensors initialised ({} registered)",
            self.sensors.len()
        ));
    }

    /// Appends one record per sensor present right now, tagged with the
    /// level when one is given. From the idle state this only leaves a WARN
    /// journal entry.
    pub fn collect(&self, level_id: Option<i64>) -> CollectOutcome {
        let started = Instant::now();
        let session_id = {
            let mut state = lock(&self.state);
            if !state.is_collecting() {
                drop(state);
                self.metrics.record_rejected();
                log_warn!("collect called while idle (level {level_id:?})");
                self.journal
                    .warn("Data collection attempted before sensors were initialised");
                return CollectOutcome::NotCollecting;
            }
            state.record_round();
            state.session_id.clone()
        };

        let tag = event_tag(level_id);
        let mut written = 0;
        for sensor in self.sensors.list_all() {
            let mut record =
                MeasurementRecord::new(Utc::now(), sensor.id, sensor.read_value(), tag.clone());
            record.session_id = session_id.clone();
            self.measurements.save_record(record);
            written += 1;
        }

        self.metrics.record_round(RoundMetrics {
            timestamp: Utc::now(),
            session_id,
            level_id,
            records_written: written,
            duration_us: started.elapsed().as_micros() as u64,
        });
        self.journal
            .info(format!("Sensor data collected: {written} records ({tag})"));
        CollectOutcome::Collected { records: written }
    }

    pub fn handle_event(&self, event: &str) {
        self.journal.info(format!("Event: {event}"));
    }

    /// Back to idle, whatever the current state.
    pub fn finish_collection(&self) {
        let finished = {
            let mut state = lock(&self.state);
            let session = state.session_id.take();
            let rounds = state.rounds;
            state.finish();
            session.map(|id| (id, rounds))
        };

        match finished {
            Some((session_id, rounds)) => self.journal.info(format!(
                "Data collection stopped (session {session_id}, {rounds} rounds)"
            )),
            None => self.journal.info("Data collection stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Sensor;
    use crate::journal::JournalLevel;
    use crate::sensing::CollectionStatus;

    struct Fixture {
        controller: DataCollectionController,
        sensors: SensorStore,
        measurements: MeasurementStore,
        journal: Journal,
        metrics: MetricsCollector,
    }

    fn fixture() -> Fixture {
        let sensors = SensorStore::new("sensors");
        sensors.add_sensor(Sensor::new(1, "load", "%", 5, 0.7));
        sensors.add_sensor(Sensor::new(2, "completion_time", "sec", 5, 120.0));
        let measurements = MeasurementStore::new("measurements");
        let journal = Journal::new();
        let metrics = MetricsCollector::new();
        let controller = DataCollectionController::new(
            sensors.clone(),
            measurements.clone(),
            journal.clone(),
            metrics.clone(),
        );
        Fixture {
            controller,
            sensors,
            measurements,
            journal,
            metrics,
        }
    }

    #[test]
    fn collect_while_idle_writes_nothing_and_warns() {
        let f = fixture();
        let outcome = f.controller.collect(Some(1));

        assert_eq!(outcome, CollectOutcome::NotCollecting);
        assert!(f.measurements.is_empty());
        assert_eq!(f.journal.count_at(JournalLevel::Warn), 1);
        assert_eq!(f.metrics.get_snapshot().rejected_count, 1);
    }

    #[test]
    fn collect_writes_one_record_per_sensor() {
        let f = fixture();
        f.controller.initialize_sensors();
        let outcome = f.controller.collect(Some(1));

        assert_eq!(outcome, CollectOutcome::Collected { records: 2 });
        let records = f.measurements.list_all();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.event_type == "MEASURE_LEVEL_1"));
        assert_eq!(records[0].value, 0.7);
        assert_eq!(records[1].value, 120.0);

        let session = f.controller.state().session_id.unwrap();
        assert!(records
            .iter()
            .all(|r| r.session_id.as_deref() == Some(session.as_str())));
        assert_eq!(f.journal.count_at(JournalLevel::Warn), 0);
    }

    #[test]
    fn collect_without_level_uses_generic_tag() {
        let f = fixture();
        f.controller.initialize_sensors();
        f.controller.collect(None);
        assert_eq!(f.measurements.by_event("MEASURE").len(), 2);
    }

    #[test]
    fn sensors_are_read_at_call_time() {
        let f = fixture();
        f.controller.initialize_sensors();
        f.sensors.add_sensor(Sensor::new(3, "fps", "Hz", 1, 60.0));
        assert_eq!(f.controller.collect(None).records(), 3);

        f.sensors.delete(1);
        assert_eq!(f.controller.collect(None).records(), 2);
        assert_eq!(f.measurements.len(), 5);
        assert_eq!(f.controller.state().rounds, 2);
    }

    #[test]
    fn finish_returns_to_idle() {
        let f = fixture();
        f.controller.finish_collection();
        assert_eq!(f.controller.state().status, CollectionStatus::Idle);

        f.controller.initialize_sensors();
        assert!(f.controller.is_collecting());
        f.controller.finish_collection();
        assert!(!f.controller.is_collecting());
        assert_eq!(f.controller.collect(None), CollectOutcome::NotCollecting);
    }

    #[test]
    fn reinitialising_keeps_the_session() {
        let f = fixture();
        f.controller.initialize_sensors();
        let first = f.controller.state().session_id;
        f.controller.initialize_sensors();
        assert_eq!(f.controller.state().session_id, first);

        f.controller.finish_collection();
        f.controller.initialize_sensors();
        assert_ne!(f.controller.state().session_id, first);
    }

    #[test]
    fn handle_event_only_logs() {
        let f = fixture();
        f.controller.handle_event("player died");
        assert!(!f.controller.is_collecting());
        assert_eq!(f.journal.view_history()[0].message, "Event: player died");
    }
}
