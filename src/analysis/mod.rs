pub mod config;
pub mod controller;
pub mod scoring;

pub use config::{AnalysisScope, ForecastConfig};
pub use controller::{AnalysisController, AnalysisSummary};
