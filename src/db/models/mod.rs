pub mod forecast;
pub mod level;
pub mod measurement;
pub mod report;
pub mod sensor;

pub use forecast::Forecast;
pub use level::{event_tag, Level, LevelInput, LevelParameters, LevelPatch};
pub use measurement::MeasurementRecord;
pub use report::Report;
pub use sensor::Sensor;
