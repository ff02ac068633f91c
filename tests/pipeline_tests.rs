use levelsight_lib::{
    analysis::scoring::REDUCE_DIFFICULTY,
    container::Container,
    db::{LevelInput, Repository},
    journal::JournalLevel,
    orchestrator::{demo_level, Orchestrator},
    sensing::CollectOutcome,
    settings::Settings,
};
use pretty_assertions::assert_eq;

const EPS: f64 = 1e-9;

fn orchestrator() -> Orchestrator {
    Orchestrator::new(Container::new(Settings::default()))
}

#[test]
fn demo_first_pass_recommends_reducing_difficulty() {
    let orchestrator = orchestrator();
    let outcome = orchestrator.run_demo().unwrap();

    let first = &outcome.first;
    assert_eq!(first.collected, CollectOutcome::Collected { records: 2 });
    assert_eq!(first.summary.records_count, 2);
    assert!((first.summary.average_value - 60.35).abs() < EPS);
    assert!((first.forecast.passability_score - 0.3485416666666667).abs() < EPS);
    assert_eq!(first.forecast.recommendation, REDUCE_DIFFICULTY);
    assert!(first
        .report
        .content
        .contains("Passability score: 0.35"));
    assert_eq!(first.report.author, "system");
    assert!(first.correct);
}

#[test]
fn demo_second_pass_sees_softened_level_and_drift() {
    let orchestrator = orchestrator();
    let outcome = orchestrator.run_demo().unwrap();
    let second = &outcome.second;

    assert_eq!(second.level.parameters["enemies"], 14.0);
    assert_eq!(second.level.parameters["traps"], 5.0);
    assert!((second.summary.level_difficulty - 0.6).abs() < EPS);
    // Both passes stay in the store: 0.7, 120, 0.63, 96.
    assert_eq!(second.summary.records_count, 4);
    assert!((second.summary.average_value - 54.3325).abs() < EPS);
    assert!(second.forecast.passability_score > outcome.first.forecast.passability_score);
    assert_ne!(second.forecast.id, outcome.first.forecast.id);
    assert_ne!(second.report.id, outcome.first.report.id);

    let container = orchestrator.container();
    assert_eq!(container.stores().reports.len(), 2);
    assert_eq!(container.stores().forecasts.len(), 2);
    assert_eq!(container.metrics().get_snapshot().round_count, 2);
}

#[test]
fn check_correctness_is_repeatable() {
    let orchestrator = orchestrator();
    orchestrator.run_demo().unwrap();

    let decision = orchestrator.container().decision();
    assert!(decision.check_correctness());
    assert!(decision.check_correctness());
}

#[test]
fn collect_while_idle_only_warns() {
    let orchestrator = orchestrator();
    let container = orchestrator.container();

    let outcome = container.data_collection().collect(Some(1));
    assert_eq!(outcome, CollectOutcome::NotCollecting);
    assert_eq!(outcome.records(), 0);
    assert!(container.stores().measurements.is_empty());
    assert_eq!(container.journal().count_at(JournalLevel::Warn), 1);
    assert_eq!(container.metrics().get_snapshot().rejected_count, 1);
}

#[test]
fn level_testing_scenario_through_interface() {
    let orchestrator = orchestrator();
    let container = orchestrator.container();
    container.level_manager().create_level(demo_level());
    container.data_collection().initialize_sensors();
    container.data_collection().collect(Some(1));
    container.data_collection().finish_collection();

    let report = container
        .interface()
        .handle_user_choice("level_testing", Some(1))
        .unwrap();
    assert_eq!(report.author, "designer");
    assert_eq!(container.interface().show_results(), vec![report]);

    assert!(container
        .interface()
        .handle_user_choice("level_testing", Some(99))
        .is_none());
    assert_eq!(container.journal().count_at(JournalLevel::Error), 1);

    assert!(container.interface().handle_user_choice("dance", None).is_none());
    assert_eq!(container.journal().count_at(JournalLevel::Warn), 1);
}

#[test]
fn reset_controller_keeps_stored_data() {
    let mut orchestrator = orchestrator();
    orchestrator
        .container()
        .level_manager()
        .create_level(LevelInput::new(5, "Kept"));
    orchestrator.run_level_test(5, "qa").unwrap();

    let container = orchestrator.container_mut();
    container.reset_controller("decision").unwrap();
    assert!(!container.decision().check_correctness());
    assert_eq!(container.repository_len("report").unwrap(), 1);
    assert!(container.reset_controller("scheduler").is_err());

    let pass = orchestrator.run_level_test(5, "qa").unwrap();
    assert_eq!(pass.report.id, 2);
}
