use crate::db::{Repository, Sensor};

use super::SensorStore;

impl SensorStore {
    pub fn add_sensor(&self, sensor: Sensor) {
        self.save(sensor);
    }

    pub fn get_sensor(&self, sensor_id: u32) -> Option<Sensor> {
        self.load(sensor_id)
    }

    pub fn update_sensor(&self, sensor: Sensor) {
        self.save(sensor);
    }

    /// Sensors whose type tag equals `kind`.
    pub fn by_kind(&self, kind: &str) -> Vec<Sensor> {
        self.find(|sensor| sensor.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_update_sensor() {
        let store = SensorStore::new("sensors");
        store.add_sensor(Sensor::new(1, "temperature", "C", 5, 22.5));
        assert_eq!(store.get_sensor(1).unwrap().read_value(), 22.5);

        let mut sensor = store.get_sensor(1).unwrap();
        sensor.value = 23.0;
        store.update_sensor(sensor);
        assert_eq!(store.get_sensor(1).unwrap().read_value(), 23.0);
        assert_eq!(store.by_kind("temperature").len(), 1);
        assert!(store.by_kind("humidity").is_empty());
    }
}
