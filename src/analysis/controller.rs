use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{
    analysis::{
        config::{AnalysisScope, ForecastConfig},
        scoring::{mean, passability_score, recommendation_for},
    },
    db::{
        repositories::{ForecastStore, MeasurementStore},
        Forecast, Level, Repository,
    },
    journal::Journal,
    utils::lock,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Aggregate view of the measurement store paired with a level's difficulty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub records_count: usize,
    pub average_value: f64,
    pub level_difficulty: f64,
}

#[derive(Clone)]
pub struct AnalysisController {
    measurements: MeasurementStore,
    forecasts: ForecastStore,
    journal: Journal,
    config: ForecastConfig,
    last_analysis: Arc<Mutex<Option<AnalysisSummary>>>,
}

impl AnalysisController {
    pub fn new(
        measurements: MeasurementStore,
        forecasts: ForecastStore,
        journal: Journal,
        config: ForecastConfig,
    ) -> Self {
        Self {
            measurements,
            forecasts,
            journal,
            config,
            last_analysis: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Counts and averages the measurement records in scope and caches the
    /// result as the last analysis. An empty store gives a mean of 0.0.
    pub fn analyze(&self, level: &Level) -> AnalysisSummary {
        let records = match self.config.scope {
            AnalysisScope::AllRecords => self.measurements.list_all(),
            AnalysisScope::Level => self.measurements.by_event(&level.event_tag()),
        };
        let values: Vec<f64> = records.iter().map(|record| record.value).collect();

        let summary = AnalysisSummary {
            records_count: values.len(),
            average_value: mean(&values),
            level_difficulty: level.difficulty,
        };

        *lock(&self.last_analysis) = Some(summary);
        self.journal.info(format!(
            "Analysis finished for level '{}': {} records, mean {:.4}, difficulty {}",
            level.name, summary.records_count, summary.average_value, summary.level_difficulty
        ));
        summary
    }

    /// Scores the level from the cached analysis (running `analyze` first if
    /// nothing is cached), stores the forecast under a fresh id and returns it.
    ///
    /// The cached summary supplies both the mean and the difficulty, so a
    /// level edited after its last analysis is scored on the old numbers
    /// until `analyze` runs again.
    pub fn forecast(&self, level: &Level) -> Forecast {
        let cached = *lock(&self.last_analysis);
        let summary = match cached {
            Some(summary) => summary,
            None => self.analyze(level),
        };

        let score = passability_score(
            summary.level_difficulty,
            summary.average_value,
            &self.config,
        );
        let recommendation = recommendation_for(score, &self.config);
        log_info!(
            "forecast for '{}': difficulty={} mean={} score={score}",
            level.name,
            summary.level_difficulty,
            summary.average_value
        );

        let forecast = Forecast::from_level(
            self.forecasts.allocate_id(),
            level,
            recommendation,
            Some(score),
        );
        self.forecasts.save_forecast(forecast.clone());
        self.journal.info(format!(
            "Forecast #{} created for level '{}'",
            forecast.id, level.name
        ));
        forecast
    }

    /// Copy of the cached analysis, if one has been computed.
    pub fn evaluate_results(&self) -> Option<AnalysisSummary> {
        let cached = *lock(&self.last_analysis);
        match &cached {
            Some(summary) => self.journal.info(format!(
                "Results evaluated: {} records, mean {:.4}, difficulty {}",
                summary.records_count, summary.average_value, summary.level_difficulty
            )),
            None => self.journal.info("Results evaluated: no analysis yet"),
        }
        cached
    }

    /// Forgets the cached analysis.
    pub fn reset(&self) {
        *lock(&self.last_analysis) = None;
    }
}
