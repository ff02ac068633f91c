use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::{
    db::{repositories::ReportStore, Forecast, Report},
    journal::Journal,
    utils::lock,
};

/// Summary line and body of the report for `forecast`.
pub fn render_report(forecast: &Forecast) -> (String, String) {
    let summary = format!("Recommendations for level '{}'", forecast.level_name);
    let content = format!(
        "Level: {}\nPassability score: {:.2}\nRecommendations: {}\n",
        forecast.level_name, forecast.passability_score, forecast.recommendation
    );
    (summary, content)
}

/// Turns forecasts into stored reports and remembers the latest one.
#[derive(Clone)]
pub struct DecisionSupportController {
    reports: ReportStore,
    journal: Journal,
    last_report: Arc<Mutex<Option<Report>>>,
}

impl DecisionSupportController {
    pub fn new(reports: ReportStore, journal: Journal) -> Self {
        Self {
            reports,
            journal,
            last_report: Arc::new(Mutex::new(None)),
        }
    }

    pub fn form_report(&self, forecast: &Forecast, author: &str) -> Report {
        let (summary, content) = render_report(forecast);
        let report = Report {
            id: self.reports.allocate_id(),
            created_at: Utc::now(),
            author: author.to_string(),
            summary,
            content,
        };

        self.reports.save_report(report.clone());
        *lock(&self.last_report) = Some(report.clone());

        self.journal.info(format!(
            "Report #{} formed from forecast #{}",
            report.id, forecast.id
        ));
        report
    }

    /// There is no transport; delivery is a journal entry.
    pub fn send_report(&self, report: &Report, user: &str) {
        self.journal
            .info(format!("Report #{} sent to user '{user}'", report.id));
    }

    /// True once any report has been formed. Does not inspect the report.
    pub fn check_correctness(&self) -> bool {
        let last_id = lock(&self.last_report).as_ref().map(|report| report.id);
        match last_id {
            Some(id) => {
                self.journal
                    .info(format!("Report #{id} checked: correctness confirmed"));
                true
            }
            None => {
                self.journal
                    .warn("Correctness check impossible: no report formed yet");
                false
            }
        }
    }

    pub fn last_report(&self) -> Option<Report> {
        lock(&self.last_report).clone()
    }

    pub fn reset(&self) {
        *lock(&self.last_report) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Level, LevelInput, Repository};
    use crate::journal::JournalLevel;

    fn forecast(id: u64, score: f64) -> Forecast {
        let level: Level = LevelInput::new(1, "Problem level").into();
        Forecast::from_level(id, &level, "reduce level difficulty", Some(score))
    }

    fn controller() -> (DecisionSupportController, ReportStore, Journal) {
        let reports = ReportStore::new("reports");
        let journal = Journal::new();
        (
            DecisionSupportController::new(reports.clone(), journal.clone()),
            reports,
            journal,
        )
    }

    #[test]
    fn report_renders_forecast() {
        let (controller, reports, _) = controller();
        let report = controller.form_report(&forecast(1, 0.3485416), "level_designer");

        assert_eq!(report.id, 1);
        assert_eq!(report.author, "level_designer");
        assert_eq!(report.summary, "Recommendations for level 'Problem level'");
        assert_eq!(
            report.content,
            "Level: Problem level\nPassability score: 0.35\nRecommendations: reduce level difficulty\n"
        );
        assert_eq!(reports.get_report(1), Some(report));
    }

    #[test]
    fn report_ids_do_not_reuse_deleted_slots() {
        let (controller, reports, _) = controller();
        controller.form_report(&forecast(1, 0.5), "a");
        let second = controller.form_report(&forecast(2, 0.5), "a");
        reports.delete(second.id);

        let third = controller.form_report(&forecast(3, 0.5), "a");
        assert_eq!(third.id, 3);
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn check_correctness_before_any_report() {
        let (controller, _, journal) = controller();
        assert!(!controller.check_correctness());
        assert_eq!(journal.count_at(JournalLevel::Warn), 1);
    }

    #[test]
    fn check_correctness_is_idempotent() {
        let (controller, _, _) = controller();
        let report = controller.form_report(&forecast(1, 0.9), "system");

        assert!(controller.check_correctness());
        assert!(controller.check_correctness());
        assert_eq!(controller.last_report(), Some(report));
    }

    #[test]
    fn send_report_only_logs() {
        let (controller, reports, journal) = controller();
        let report = controller.form_report(&forecast(1, 0.9), "system");
        controller.send_report(&report, "designer");

        assert_eq!(reports.len(), 1);
        let last = journal.view_history().pop().unwrap();
        assert_eq!(last.message, "Report #1 sent to user 'designer'");
    }
}
