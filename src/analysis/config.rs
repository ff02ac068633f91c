use serde::{Deserialize, Serialize};

/// Which measurement records feed an analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisScope {
    /// Every record in the store, whatever level or round produced it.
    #[default]
    AllRecords,
    /// Only records tagged with the analysed level's event tag.
    Level,
}

/// Tunable constants of the passability forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    /// Weight of the level's own difficulty.
    pub difficulty_weight: f64,
    /// Weight of the normalised mean sensor reading.
    pub load_weight: f64,
    /// Expected completion time in seconds; mean readings are divided by it.
    pub baseline_completion_secs: f64,
    /// Scores strictly below this get the "reduce difficulty" advice.
    pub balance_threshold: f64,
    pub scope: AnalysisScope,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            difficulty_weight: 0.5,
            load_weight: 0.5,
            baseline_completion_secs: 120.0,
            balance_threshold: 0.5,
            scope: AnalysisScope::AllRecords,
        }
    }
}
