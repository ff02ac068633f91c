//! Simulated sensor drift between collection rounds.
//!
//! Sensors here have no device behind them, so something has to move their
//! values to make a second round differ from the first. Each rule scales
//! every sensor of one type and floors the result; an optional jitter adds
//! uniform noise on top.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::db::repositories::SensorStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriftRule {
    pub sensor_kind: String,
    pub scale: f64,
    pub floor: f64,
}

impl DriftRule {
    pub fn new(sensor_kind: impl Into<String>, scale: f64, floor: f64) -> Self {
        Self {
            sensor_kind: sensor_kind.into(),
            scale,
            floor,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value * self.scale).max(self.floor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriftSettings {
    pub rules: Vec<DriftRule>,
    /// Half-width of the uniform noise added after scaling; 0 disables it.
    pub jitter: f64,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            rules: vec![
                DriftRule::new("completion_time", 0.8, 60.0),
                DriftRule::new("load", 0.9, 0.3),
            ],
            jitter: 0.0,
        }
    }
}

/// Applies every matching rule to the stored sensors. Returns how many
/// sensors matched a rule.
pub fn apply_drift<R: Rng + ?Sized>(
    sensors: &SensorStore,
    settings: &DriftSettings,
    rng: &mut R,
) -> usize {
    let mut touched = 0;
    sensors.update_all(|sensor| {
        let Some(rule) = settings
            .rules
            .iter()
            .find(|rule| rule.sensor_kind == sensor.kind)
        else {
            return;
        };

        let mut value = rule.apply(sensor.value);
        if settings.jitter > 0.0 {
            value += rng.gen_range(-settings.jitter..=settings.jitter);
            value = value.max(rule.floor);
        }
        sensor.value = value;
        touched += 1;
    });
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Sensor;
    use rand::{rngs::StdRng, SeedableRng};

    fn sensors() -> SensorStore {
        let store = SensorStore::new("sensors");
        store.add_sensor(Sensor::new(1, "load", "%", 5, 0.7));
        store.add_sensor(Sensor::new(2, "completion_time", "sec", 5, 120.0));
        store.add_sensor(Sensor::new(3, "temperature", "C", 5, 22.5));
        store
    }

    #[test]
    fn default_rules_scale_and_floor() {
        let store = sensors();
        let mut rng = StdRng::seed_from_u64(7);
        let touched = apply_drift(&store, &DriftSettings::default(), &mut rng);

        assert_eq!(touched, 2);
        assert!((store.get_sensor(1).unwrap().value - 0.63).abs() < 1e-9);
        assert!((store.get_sensor(2).unwrap().value - 96.0).abs() < 1e-9);
        assert_eq!(store.get_sensor(3).unwrap().value, 22.5);

        for _ in 0..10 {
            apply_drift(&store, &DriftSettings::default(), &mut rng);
        }
        assert_eq!(store.get_sensor(1).unwrap().value, 0.3);
        assert_eq!(store.get_sensor(2).unwrap().value, 60.0);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let settings = DriftSettings {
            rules: vec![DriftRule::new("completion_time", 1.0, 0.0)],
            jitter: 2.0,
        };
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let store = sensors();
            apply_drift(&store, &settings, &mut rng);
            let value = store.get_sensor(2).unwrap().value;
            assert!((118.0..=122.0).contains(&value), "{value}");
        }
    }
}
