//! Composition root.
//!
//! Builds every store and controller once, in dependency order, and hands
//! out clones of the handles. Nothing is looked up by key at call time;
//! string keys only appear at the edges (`reset_controller`,
//! `repository_len`) where an unknown key is a wiring bug and fails loudly.

use std::{fmt, str::FromStr};

use anyhow::{bail, Error, Result};

use crate::{
    analysis::AnalysisController,
    db::{
        repositories::{ForecastStore, LevelStore, MeasurementStore, ReportStore, SensorStore},
        Repository,
    },
    decision::DecisionSupportController,
    interface::InterfaceController,
    journal::Journal,
    levels::LevelManager,
    metrics::MetricsCollector,
    sensing::DataCollectionController,
    settings::Settings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    Sensor,
    Level,
    Measurement,
    Forecast,
    Report,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Sensor => "sensor",
            RepositoryKind::Level => "level",
            RepositoryKind::Measurement => "storage",
            RepositoryKind::Forecast => "forecast",
            RepositoryKind::Report => "report",
        }
    }
}

impl FromStr for RepositoryKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "sensor" => Ok(RepositoryKind::Sensor),
            "level" => Ok(RepositoryKind::Level),
            "storage" | "measurement" => Ok(RepositoryKind::Measurement),
            "forecast" => Ok(RepositoryKind::Forecast),
            "report" => Ok(RepositoryKind::Report),
            other => bail!("unknown repository type '{other}'"),
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    Data,
    Analysis,
    Decision,
    Interface,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::Data => "data",
            ControllerKind::Analysis => "analysis",
            ControllerKind::Decision => "decision",
            ControllerKind::Interface => "interface",
        }
    }
}

impl FromStr for ControllerKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "data" => Ok(ControllerKind::Data),
            "analysis" => Ok(ControllerKind::Analysis),
            "decision" => Ok(ControllerKind::Decision),
            "interface" => Ok(ControllerKind::Interface),
            other => bail!("unknown controller type '{other}'"),
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Stores {
    pub sensors: SensorStore,
    pub levels: LevelStore,
    pub measurements: MeasurementStore,
    pub forecasts: ForecastStore,
    pub reports: ReportStore,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            sensors: SensorStore::new("sensors"),
            levels: LevelStore::new("levels"),
            measurements: MeasurementStore::new("measurements"),
            forecasts: ForecastStore::new("forecasts"),
            reports: ReportStore::new("reports"),
        }
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Container {
    settings: Settings,
    journal: Journal,
    metrics: MetricsCollector,
    stores: Stores,
    levels: LevelManager,
    data: DataCollectionController,
    analysis: AnalysisController,
    decision: DecisionSupportController,
    interface: InterfaceController,
}

impl Container {
    /// Wires everything and registers the sensors listed in `settings`.
    pub fn new(settings: Settings) -> Self {
        let journal = Journal::new();
        let metrics = MetricsCollector::new();
        let stores = Stores::new();

        for sensor in &settings.sensors {
            stores.sensors.add_sensor(sensor.clone());
        }

        let levels = LevelManager::new(stores.levels.clone());
        let data = build_data(&stores, &journal, &metrics);
        let analysis = build_analysis(&stores, &journal, &settings);
        let decision = build_decision(&stores, &journal);
        let interface = InterfaceController::new(
            levels.clone(),
            analysis.clone(),
            decision.clone(),
            journal.clone(),
        );

        journal.info(format!(
            "Container configured: {} sensors registered",
            stores.sensors.len()
        ));

        Self {
            settings,
            journal,
            metrics,
            stores,
            levels,
            data,
            analysis,
            decision,
            interface,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn level_manager(&self) -> &LevelManager {
        &self.levels
    }

    pub fn data_collection(&self) -> &DataCollectionController {
        &self.data
    }

    pub fn analysis(&self) -> &AnalysisController {
        &self.analysis
    }

    pub fn decision(&self) -> &DecisionSupportController {
        &self.decision
    }

    pub fn interface(&self) -> &InterfaceController {
        &self.interface
    }

    /// Number of entities in the store named `key`.
    pub fn repository_len(&self, key: &str) -> Result<usize> {
        let len = match key.parse::<RepositoryKind>()? {
            RepositoryKind::Sensor => self.stores.sensors.len(),
            RepositoryKind::Level => self.stores.levels.len(),
            RepositoryKind::Measurement => self.stores.measurements.len(),
            RepositoryKind::Forecast => self.stores.forecasts.len(),
            RepositoryKind::Report => self.stores.reports.len(),
        };
        Ok(len)
    }

    /// Replaces one controller with a freshly built one, dropping whatever
    /// it cached (collection session, last analysis, last report, results).
    /// The interface embeds the analysis and decision controllers, so it is
    /// rewired to the new one but keeps its accumulated results. Stores are
    /// shared and keep their contents.
    pub fn reset_controller(&mut self, key: &str) -> Result<ControllerKind> {
        let kind = key.parse::<ControllerKind>()?;
        match kind {
            ControllerKind::Data => {
                self.data = build_data(&self.stores, &self.journal, &self.metrics);
            }
            ControllerKind::Analysis => {
                self.analysis = build_analysis(&self.stores, &self.journal, &self.settings);
                self.rewire_interface();
            }
            ControllerKind::Decision => {
                self.decision = build_decision(&self.stores, &self.journal);
                self.rewire_interface();
            }
            ControllerKind::Interface => {
                self.interface = InterfaceController::new(
                    self.levels.clone(),
                    self.analysis.clone(),
                    self.decision.clone(),
                    self.journal.clone(),
                );
            }
        }

        self.journal.info(format!("Controller '{kind}' recreated"));
        Ok(kind)
    }

    fn rewire_interface(&mut self) {
        self.interface = self
            .interface
            .rewired(self.analysis.clone(), self.decision.clone());
    }
}

fn build_data(
    stores: &Stores,
    journal: &Journal,
    metrics: &MetricsCollector,
) -> DataCollectionController {
    DataCollectionController::new(
        stores.sensors.clone(),
        stores.measurements.clone(),
        journal.clone(),
        metrics.clone(),
    )
}

fn build_analysis(stores: &Stores, journal: &Journal, settings: &Settings) -> AnalysisController {
    AnalysisController::new(
        stores.measurements.clone(),
        stores.forecasts.clone(),
        journal.clone(),
        settings.forecast.clone(),
    )
}

fn build_decision(stores: &Stores, journal: &Journal) -> DecisionSupportController {
    DecisionSupportController::new(stores.reports.clone(), journal.clone())
}
