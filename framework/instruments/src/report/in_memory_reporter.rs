use crate::report::summary_report::print_aggregate;
use crate::report::ReportCollector;
use container_bench_summary_model::ScenarioReport;
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every report in memory and prints the aggregate at the end of the run.
///
/// Useful for tests and for runs where the per scenario tables are just noise.
pub struct InMemoryReportCollector {
    reports: Arc<Mutex<Vec<ScenarioReport>>>,
}

impl InMemoryReportCollector {
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn shared_reports(&self) -> Arc<Mutex<Vec<ScenarioReport>>> {
        self.reports.clone()
    }
}

impl Default for InMemoryReportCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportCollector for InMemoryReportCollector {
    fn add_scenario(&mut self, report: &ScenarioReport) {
        self.reports.lock().push(report.clone());
    }

    fn finalize(&self) {
        print_aggregate(&self.reports.lock());
    }
}
