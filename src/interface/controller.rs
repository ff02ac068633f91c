use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
};

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::AnalysisController,
    db::Report,
    decision::DecisionSupportController,
    journal::Journal,
    levels::LevelManager,
    utils::lock,
};

const DESIGNER: &str = "designer";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Monitoring,
    LevelTesting,
    HistoricalAnalysis,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Monitoring,
        Scenario::LevelTesting,
        Scenario::HistoricalAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Monitoring => "monitoring",
            Scenario::LevelTesting => "level_testing",
            Scenario::HistoricalAnalysis => "historical_analysis",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "monitoring" => Ok(Scenario::Monitoring),
            "level_testing" => Ok(Scenario::LevelTesting),
            "historical_analysis" => Ok(Scenario::HistoricalAnalysis),
            other => bail!("unknown scenario '{other}'"),
        }
    }
}

/// Front-end facing controller: lists scenarios, runs the one the user
/// picks and keeps the reports produced along the way.
#[derive(Clone)]
pub struct InterfaceController {
    levels: LevelManager,
    analysis: AnalysisController,
    decision: DecisionSupportController,
    journal: Journal,
    last_results: Arc<Mutex<Vec<Report>>>,
}

impl InterfaceController {
    pub fn new(
        levels: LevelManager,
        analysis: AnalysisController,
        decision: DecisionSupportController,
        journal: Journal,
    ) -> Self {
        Self {
            levels,
            analysis,
            decision,
            journal,
            last_results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Same controller wired to other analysis and decision handles. The
    /// results accumulated so far are shared with the new controller.
    pub fn rewired(
        &self,
        analysis: AnalysisController,
        decision: DecisionSupportController,
    ) -> Self {
        Self {
            levels: self.levels.clone(),
            analysis,
            decision,
            journal: self.journal.clone(),
            last_results: Arc::clone(&self.last_results),
        }
    }

    pub fn show_scenarios(&self) -> Vec<Scenario> {
        let scenarios = Scenario::ALL.to_vec();
        let names: Vec<_> = scenarios.iter().map(Scenario::as_str).collect();
        self.journal
            .info(format!("Scenario list requested: {}", names.join(", ")));
        scenarios
    }

    pub fn show_results(&self) -> Vec<Report> {
        let results = lock(&self.last_results).clone();
        self.journal
            .info(format!("Results requested: {} reports", results.len()));
        results
    }

    pub fn update_interface(&self) {
        self.journal.info("Interface updated");
    }

    /// Runs the chosen scenario. Only `level_testing` with an existing level
    /// does real work (analyze, forecast, report, check); the other
    /// scenarios and unknown names just leave journal entries. Returns the
    /// report when one was formed.
    pub fn handle_user_choice(&self, scenario: &str, level_id: Option<i64>) -> Option<Report> {
        self.journal.info(format!(
            "Scenario '{scenario}' chosen (level={})",
            level_id.map_or_else(|| "none".to_string(), |id| id.to_string())
        ));

        let scenario = match scenario.parse::<Scenario>() {
            Ok(scenario) => scenario,
            Err(err) => {
                self.journal.warn(format!("Unknown scenario: {err}"));
                return None;
            }
        };

        match scenario {
            Scenario::LevelTesting => self.run_level_testing(level_id?),
            Scenario::Monitoring => {
                self.journal.info("Monitoring scenario activated");
                None
            }
            Scenario::HistoricalAnalysis => {
                self.journal.info("Historical analysis scenario activated");
                None
            }
        }
    }

    fn run_level_testing(&self, level_id: i64) -> Option<Report> {
        let Some(level) = self.levels.get_level(level_id) else {
            self.journal
                .error(format!("Level with id={level_id} not found"));
            return None;
        };

        self.analysis.analyze(&level);
        let forecast = self.analysis.forecast(&level);
        let report = self.decision.form_report(&forecast, DESIGNER);
        self.decision.check_correctness();

        lock(&self.last_results).push(report.clone());
        self.journal.info(format!(
            "Scenario 'level_testing' finished, report #{}",
            report.id
        ));
        Some(report)
    }
}
