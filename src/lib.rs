pub mod analysis;
pub mod container;
pub mod db;
pub mod decision;
pub mod interface;
pub mod journal;
pub mod levels;
pub mod metrics;
pub mod orchestrator;
pub mod sensing;
pub mod settings;
pub mod utils;

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use log::{error, info};

use container::Container;
use orchestrator::{DemoOutcome, Orchestrator};
use settings::{Settings, SettingsStore};

/// Environment variable naming a JSON settings file.
pub const SETTINGS_ENV: &str = "LEVELSIGHT_SETTINGS";

/// Settings from the file named by `LEVELSIGHT_SETTINGS`, or defaults.
pub fn load_settings() -> Result<Settings> {
    match env::var_os(SETTINGS_ENV) {
        Some(path) => {
            let store = SettingsStore::new(PathBuf::from(path))
                .context("Failed to initialize settings store")?;
            info!("Settings loaded from {}", store.path().display());
            Ok(store.settings())
        }
        None => Ok(Settings::default()),
    }
}

pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run_demo() {
        error!("Level testing demo failed: {err:?}");
        std::process::exit(1);
    }
}

fn run_demo() -> Result<()> {
    let settings = load_settings()?;
    let export_format = settings.report.export_format.clone();
    let orchestrator = Orchestrator::new(Container::new(settings));

    let outcome = orchestrator.run_demo()?;
    print_outcome(&orchestrator, &outcome, &export_format)
}

fn print_outcome(orchestrator: &Orchestrator, outcome: &DemoOutcome, format: &str) -> Result<()> {
    let container = orchestrator.container();

    for (label, pass) in [("First pass", &outcome.first), ("Second pass", &outcome.second)] {
        println!("=== {label} ===");
        println!("{}", pass.report.content);
        println!(
            "Records analysed: {}, mean value: {:.4}",
            pass.summary.records_count, pass.summary.average_value
        );
    }

    if let Some(report) = container.decision().last_report() {
        println!("=== Export ===");
        println!("{}", report.export(format));
    }

    println!("=== Journal ===");
    for entry in container.journal().view_history() {
        println!("{entry}");
    }

    let snapshot = container.metrics().get_snapshot();
    println!("=== Collection metrics ===");
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize metrics")?
    );
    Ok(())
}
