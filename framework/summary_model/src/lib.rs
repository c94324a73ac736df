mod report;

use container_bench_core::prelude::DataTypeFamily;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::BTreeMap;
use std::io::{BufRead, Read, Write};
use std::path::Path;

pub use report::{
    relative_ratio, CandidateOutcome, CandidateResult, CandidateTiming, CounterSummary,
    ScenarioReport,
};

/// The session configuration recorded with a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSettings {
    pub clock_resolution_multiple: u64,
    pub relative: bool,
    pub performance_counters: bool,
    pub epochs: usize,
}

/// Summary of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// The unique run id
    ///
    /// Chosen by the runner. Unique for each run.
    pub run_id: String,
    /// The name of the benchmark that was run
    pub bench_name: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The configuration every measurement session of the run was created with
    pub settings: SessionSettings,
    /// The number of scenarios run for each family
    pub scenario_count: u32,
    /// The candidate labels for each family, in measurement order
    pub candidates: BTreeMap<DataTypeFamily, Vec<String>>,
    /// The number of scenario reports that were emitted
    pub reports_emitted: usize,
    /// The number of candidates that could not be measured
    ///
    /// Failed candidates are still present in their scenario report, with a failure marker.
    pub failures: usize,
    /// The version of the harness that was used for this run
    pub bench_version: String,
}

impl RunSummary {
    /// Create a new run summary
    pub fn new(
        run_id: String,
        bench_name: String,
        started_at: i64,
        settings: SessionSettings,
        scenario_count: u32,
        candidates: BTreeMap<DataTypeFamily, Vec<String>>,
        bench_version: String,
    ) -> Self {
        Self {
            run_id,
            bench_name,
            started_at,
            settings,
            scenario_count,
            candidates,
            reports_emitted: 0,
            failures: 0,
            bench_version,
        }
    }

    /// Account for an emitted scenario report
    pub fn record_report(&mut self, report: &ScenarioReport) {
        self.reports_emitted += 1;
        self.failures += report.failures().count();
    }

    /// Account for a scenario whose baseline could not be measured
    pub fn record_baseline_failure(&mut self) {
        self.failures += 1;
    }

    /// Compute a fingerprint for this run summary
    ///
    /// The fingerprint is intended to identify the configuration used for the run, so that runs
    /// with comparable results can be grouped. It uses the
    ///     - Bench name
    ///     - Session settings
    ///     - Scenario count
    ///     - Candidates per family
    ///     - Harness version
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.bench_name.as_bytes());
        Digest::update(
            &mut hasher,
            self.settings.clock_resolution_multiple.to_le_bytes(),
        );
        Digest::update(&mut hasher, [self.settings.relative as u8]);
        Digest::update(&mut hasher, [self.settings.performance_counters as u8]);
        Digest::update(&mut hasher, (self.settings.epochs as u64).to_le_bytes());
        Digest::update(&mut hasher, self.scenario_count.to_le_bytes());
        self.candidates
            .iter()
            .sorted_by_key(|(family, _)| family.name())
            .for_each(|(family, labels)| {
                Digest::update(&mut hasher, family.name().as_bytes());
                for label in labels {
                    Digest::update(&mut hasher, label.as_bytes());
                    Digest::update(&mut hasher, [0u8]);
                }
            });
        Digest::update(&mut hasher, self.bench_version.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Append a record to a JSON lines file
///
/// The record will be serialized to JSON and output as a single line followed by a newline.
pub fn append_json_line<T: Serialize>(record: &T, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_json(record, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Append the run summary to a file
///
/// The recommended file extension is `.jsonl`.
pub fn append_run_summary(run_summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    append_json_line(run_summary, path)
}

/// Serialize a record to a writer
pub fn store_json<T: Serialize, W: Write>(record: &T, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, record)?;
    Ok(())
}

/// Load a run summary from a reader
pub fn load_run_summary<R: Read>(reader: R) -> anyhow::Result<RunSummary> {
    let reader = std::io::BufReader::new(reader);
    let run_summary: RunSummary = serde_json::from_reader(reader)?;
    Ok(run_summary)
}

/// Load every record from a JSON lines file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_json_line]. Blank lines are skipped.
pub fn load_json_lines<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Load run summaries from a file
pub fn load_summary_runs(path: &Path) -> anyhow::Result<Vec<RunSummary>> {
    load_json_lines(path)
}

/// Load scenario reports from a file written by the JSON lines report collector
pub fn load_scenario_reports(path: &Path) -> anyhow::Result<Vec<ScenarioReport>> {
    load_json_lines(path)
}
