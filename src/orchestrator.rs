//! Pipeline driver: collection, analysis, forecast, report.

use anyhow::{anyhow, bail, Result};
use serde::Serialize;

use crate::{
    analysis::AnalysisSummary,
    container::Container,
    db::{Forecast, Level, LevelInput, LevelParameters, LevelPatch, Report},
    interface::Scenario,
    sensing::{apply_drift, CollectOutcome},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_error;

const DEMO_LEVEL_ID: i64 = 1;
/// Factor applied to every level parameter when the designer softens a level.
const PARAMETER_SOFTENING: f64 = 0.7;
const DIFFICULTY_STEP: f64 = 0.2;

/// Everything one pass of the pipeline produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassOutcome {
    pub level: Level,
    pub collected: CollectOutcome,
    pub summary: AnalysisSummary,
    pub forecast: Forecast,
    pub report: Report,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoOutcome {
    pub first: PassOutcome,
    pub second: PassOutcome,
}

pub struct Orchestrator {
    container: Container,
}

impl Orchestrator {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// One full pass for a stored level: initialise sensors, collect one
    /// round tagged with the level, stop, analyse, forecast, report, send
    /// and check. Fails only when the level does not exist.
    pub fn run_level_test(&self, level_id: i64, author: &str) -> Result<PassOutcome> {
        let Some(level) = self.container.level_manager().get_level(level_id) else {
            log_error!("level test requested for unknown level {level_id}");
            bail!("level {level_id} not found");
        };

        let journal = self.container.journal();
        journal.info(format!("Level testing started for level id={level_id}"));

        let data = self.container.data_collection();
        data.initialize_sensors();
        let collected = data.collect(Some(level.id));
        data.finish_collection();

        let analysis = self.container.analysis();
        let summary = analysis.analyze(&level);
        let forecast = analysis.forecast(&level);
        journal.info(format!(
            "Recommendation prepared: {}",
            forecast.recommendation
        ));

        let decision = self.container.decision();
        let report = decision.form_report(&forecast, author);
        decision.send_report(&report, author);
        let correct = decision.check_correctness();

        Ok(PassOutcome {
            level,
            collected,
            summary,
            forecast,
            report,
            correct,
        })
    }

    /// Scales every parameter by 0.7 (truncated, floored at 0) and lowers
    /// difficulty by 0.2 (floored at 0).
    pub fn soften_level(&self, level_id: i64) -> Result<Level> {
        let levels = self.container.level_manager();
        let current = levels
            .get_level(level_id)
            .ok_or_else(|| anyhow!("level {level_id} not found"))?;

        let parameters: LevelParameters = current
            .parameters
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    (value * PARAMETER_SOFTENING).trunc().max(0.0),
                )
            })
            .collect();
        let patch = LevelPatch {
            parameters: Some(parameters),
            difficulty: Some((current.difficulty - DIFFICULTY_STEP).max(0.0)),
            ..LevelPatch::default()
        };

        let updated = levels
            .edit_level(level_id, patch)
            .ok_or_else(|| anyhow!("level {level_id} vanished during edit"))?;
        self.container.journal().info(format!(
            "Designer changed parameters of level id={level_id}"
        ));
        Ok(updated)
    }

    /// Moves simulated sensor values according to the drift settings.
    pub fn drift_sensors(&self) -> usize {
        let mut rng = rand::thread_rng();
        apply_drift(
            &self.container.stores().sensors,
            &self.container.settings().drift,
            &mut rng,
        )
    }

    /// Two passes over the same level: the second after softening the level
    /// and drifting the sensors, so the forecasts differ. Reports are
    /// authored by the configured default author.
    pub fn run_demo(&self) -> Result<DemoOutcome> {
        let journal = self.container.journal();

        self.container.interface().show_scenarios();
        journal.info(format!(
            "Level designer chooses scenario '{}'",
            Scenario::LevelTesting
        ));

        let author = self.container.settings().report.default_author.clone();
        let level = self.container.level_manager().create_level(demo_level());
        let first = self.run_level_test(level.id, &author)?;

        self.soften_level(level.id)?;
        let drifted = self.drift_sensors();
        journal.info(format!("Sensor drift applied to {drifted} sensors"));

        journal.info(format!(
            "Level testing repeated for level id={}",
            level.id
        ));
        let second = self.run_level_test(level.id, &author)?;

        journal.info("Final level testing results displayed");
        Ok(DemoOutcome { first, second })
    }
}

/// Level suspected of low passability.
pub fn demo_level() -> LevelInput {
    let parameters: LevelParameters = [("enemies", 20.0), ("traps", 8.0)]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    LevelInput::new(DEMO_LEVEL_ID, "Problem level")
        .with_difficulty(0.8)
        .with_parameters(parameters)
        .with_description("Level suspected of low passability")
}
