use crate::report::ReportCollector;
use container_bench_summary_model::{append_json_line, ScenarioReport};
use std::path::PathBuf;

/// Appends every scenario report to a JSON lines file, one report per line.
pub struct JsonlReportCollector {
    path: PathBuf,
    written: usize,
}

impl JsonlReportCollector {
    pub fn new(path: PathBuf) -> Self {
        Self { path, written: 0 }
    }
}

impl ReportCollector for JsonlReportCollector {
    fn add_scenario(&mut self, report: &ScenarioReport) {
        match append_json_line(report, &self.path) {
            Ok(()) => self.written += 1,
            Err(e) => log::warn!(
                "Failed to write report for {} scenario {} to {}: {:?}",
                report.family,
                report.scenario,
                self.path.display(),
                e
            ),
        }
    }

    fn finalize(&self) {
        log::info!(
            "Wrote {} scenario reports to {}",
            self.written,
            self.path.display()
        );
    }
}
