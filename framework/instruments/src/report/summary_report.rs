mod scenario_table;

use crate::report::aggregate::aggregate_reports;
use crate::report::ReportCollector;
use container_bench_summary_model::ScenarioReport;
use tabled::settings::Style;
use tabled::Table;

/// Prints a comparison table for every scenario as soon as it is reported, then a per-family
/// aggregate once the run is finished.
pub struct SummaryReportCollector {
    reports: Vec<ScenarioReport>,
}

impl SummaryReportCollector {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }
}

impl Default for SummaryReportCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportCollector for SummaryReportCollector {
    fn add_scenario(&mut self, report: &ScenarioReport) {
        scenario_table::print_scenario(report);
        self.reports.push(report.clone());
    }

    fn finalize(&self) {
        print_aggregate(&self.reports);
    }
}

pub(crate) fn print_aggregate(reports: &[ScenarioReport]) {
    let rows = aggregate_reports(reports);
    if rows.is_empty() {
        return;
    }

    println!("\nSummary of {} scenarios", reports.len());
    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{table}");
}
