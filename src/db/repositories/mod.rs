//! Entity-specific queries on the generic store.

mod forecasts;
mod measurements;
mod reports;
mod sensors;

use super::{Forecast, Level, MeasurementRecord, MemoryStore, Report, Sensor};

pub type SensorStore = MemoryStore<Sensor>;
pub type LevelStore = MemoryStore<Level>;
pub type MeasurementStore = MemoryStore<MeasurementRecord>;
pub type ForecastStore = MemoryStore<Forecast>;
pub type ReportStore = MemoryStore<Report>;
