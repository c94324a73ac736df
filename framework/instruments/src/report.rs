mod aggregate;
mod in_memory_reporter;
mod jsonl_reporter;
mod summary_report;

use container_bench_summary_model::ScenarioReport;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

pub use aggregate::{aggregate_reports, AggregateRow};
pub use in_memory_reporter::InMemoryReportCollector;
pub use jsonl_reporter::JsonlReportCollector;
pub use summary_report::SummaryReportCollector;

pub trait ReportCollector: Send {
    /// Receive the report of one finished scenario.
    fn add_scenario(&mut self, report: &ScenarioReport);

    /// Called once, after the last scenario of the run.
    fn finalize(&self);
}

/// Fans each scenario report out to the configured collectors.
pub struct Reporter {
    collectors: Mutex<Vec<Box<dyn ReportCollector>>>,
    in_memory: Option<Arc<Mutex<Vec<ScenarioReport>>>>,
}

impl Reporter {
    pub fn add_scenario(&self, report: &ScenarioReport) {
        for collector in self.collectors.lock().iter_mut() {
            collector.add_scenario(report);
        }
    }

    pub fn finalize(&self) {
        for collector in self.collectors.lock().iter() {
            collector.finalize();
        }
    }

    /// Every report received so far, if the in-memory collector is enabled.
    pub fn in_memory_reports(&self) -> Option<Vec<ScenarioReport>> {
        self.in_memory.as_ref().map(|reports| reports.lock().clone())
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("collectors", &self.collectors.lock().len())
            .field("in_memory", &self.in_memory.is_some())
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ReportConfig {
    summary: bool,
    in_memory: bool,
    jsonl_path: Option<PathBuf>,
}

impl ReportConfig {
    /// Print a table per scenario as soon as it finishes, and an aggregate at the end.
    pub fn enable_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    /// Keep every report in memory and print only the aggregate at the end.
    pub fn enable_in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Append every report to a JSON lines file.
    pub fn enable_jsonl(mut self, path: PathBuf) -> Self {
        self.jsonl_path = Some(path);
        self
    }

    pub fn init(self) -> Reporter {
        let mut collectors: Vec<Box<dyn ReportCollector>> = Vec::new();
        let mut in_memory = None;

        if self.summary {
            collectors.push(Box::new(SummaryReportCollector::new()));
        }

        if self.in_memory {
            let collector = InMemoryReportCollector::new();
            in_memory = Some(collector.shared_reports());
            collectors.push(Box::new(collector));
        }

        if let Some(path) = self.jsonl_path {
            collectors.push(Box::new(JsonlReportCollector::new(path)));
        }

        Reporter {
            collectors: Mutex::new(collectors),
            in_memory,
        }
    }
}

pub(crate) fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

pub(crate) fn ratio_display(ratio: &Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.3}", ratio),
        None => "-".to_string(),
    }
}
