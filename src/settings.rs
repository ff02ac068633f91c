use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::{
    analysis::ForecastConfig,
    db::Sensor,
    sensing::DriftSettings,
    utils::{read, write},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSettings {
    pub default_author: String,
    pub export_format: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_author: "system".into(),
            export_format: "txt".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub forecast: ForecastConfig,
    pub report: ReportSettings,
    /// Sensors registered when the container is built.
    pub sensors: Vec<Sensor>,
    pub drift: DriftSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig::default(),
            report: ReportSettings::default(),
            sensors: default_sensors(),
            drift: DriftSettings::default(),
        }
    }
}

/// Player load in percent and level completion time in seconds.
pub fn default_sensors() -> Vec<Sensor> {
    vec![
        Sensor::new(1, "load", "%", 5, 0.7),
        Sensor::new(2, "completion_time", "sec", 5, 120.0),
    ]
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields defaults; so does a
    /// file that fails to parse, with a warning.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(
                        "Ignoring malformed settings file {}: {err}",
                        path.display()
                    );
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        read(&self.data).clone()
    }

    pub fn forecast(&self) -> ForecastConfig {
        read(&self.data).forecast.clone()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        let mut guard = write(&self.data);
        *guard = settings;
        self.persist(&guard)
    }

    pub fn update_forecast(&self, forecast: ForecastConfig) -> Result<()> {
        let mut guard = write(&self.data);
        guard.forecast = forecast;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        *write(&self.data) = data;
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisScope;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.settings();

        assert_eq!(settings.forecast.baseline_completion_secs, 120.0);
        assert_eq!(settings.forecast.difficulty_weight, 0.5);
        assert_eq!(settings.forecast.load_weight, 0.5);
        assert_eq!(settings.forecast.balance_threshold, 0.5);
        assert_eq!(settings.forecast.scope, AnalysisScope::AllRecords);
        assert_eq!(settings.report.default_author, "system");
        assert_eq!(settings.sensors.len(), 2);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.settings().report.export_format, "txt");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"forecast": {"baselineCompletionSecs": 90.0}}"#).unwrap();

        let store = SettingsStore::new(path).unwrap();
        let forecast = store.forecast();
        assert_eq!(forecast.baseline_completion_secs, 90.0);
        assert_eq!(forecast.difficulty_weight, 0.5);
        assert_eq!(store.settings().sensors.len(), 2);
    }

    #[test]
    fn partial_report_section_keeps_other_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"forecast": {"baselineCompletionSecs": 90.0}, "report": {"defaultAuthor": "qa"}}"#,
        )
        .unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.forecast.baseline_completion_secs, 90.0);
        assert_eq!(settings.report.default_author, "qa");
        assert_eq!(settings.report.export_format, "txt");
    }

    #[test]
    fn updates_persist_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut forecast = store.forecast();
        forecast.scope = AnalysisScope::Level;
        store.update_forecast(forecast).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.forecast().scope, AnalysisScope::Level);

        let mut settings = reopened.settings();
        settings.report.default_author = "qa".into();
        reopened.update(settings).unwrap();
        store.reload().unwrap();
        assert_eq!(store.settings().report.default_author, "qa");
    }
}
