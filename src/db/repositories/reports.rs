use crate::db::{Report, Repository};

use super::ReportStore;

impl ReportStore {
    pub fn save_report(&self, report: Report) {
        self.save(report);
    }

    pub fn get_report(&self, report_id: u64) -> Option<Report> {
        self.load(report_id)
    }

    pub fn find_by_author(&self, author: &str) -> Vec<Report> {
        self.find(|report| report.author == author)
    }
}
