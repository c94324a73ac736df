use clap::{Parser, ValueEnum};
use container_bench_core::prelude::DataTypeFamily;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct ContainerBenchCli {
    /// Only benchmark the given container family. Use the flag multiple times to select more
    /// than one, for example `--family=sequence --family=text`.
    ///
    /// Defaults to every family the benchmark defines.
    #[arg(long, value_enum)]
    pub family: Vec<FamilyOpt>,

    /// The number of scenarios to run per family, starting from scenario 0.
    ///
    /// Defaults to every scenario the workloads define.
    #[arg(long)]
    pub scenario_count: Option<u32>,

    /// Favour speed over accuracy by using a small clock resolution multiple.
    ///
    /// Results are noisy but a full run finishes in seconds, which is useful while developing
    /// workloads.
    #[arg(long, default_value = "false")]
    pub fast: bool,

    /// Override the clock resolution multiple. Each epoch of a measurement runs for at least this
    /// many times the resolution of the clock, up to the maximum epoch time.
    #[arg(long)]
    pub clock_resolution_multiple: Option<u64>,

    /// Do not sample hardware performance counters.
    #[arg(long, default_value = "false")]
    pub no_perf_counters: bool,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// The reporter to use.
    #[arg(long, value_enum, default_value_t = ReporterOpt::Summary)]
    pub reporter: ReporterOpt,

    /// Also append every scenario report to this JSON lines file.
    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Append a summary of the run to this JSON lines file.
    #[arg(long)]
    pub run_summary_path: Option<PathBuf>,

    /// Set the ID of this run
    ///
    /// If not set, a random ID is used.
    #[arg(long, short)]
    pub run_id: Option<String>,

    /// What to do when a workload fails for one candidate.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyOpt {
    Sequence,
    Text,
}

impl From<FamilyOpt> for DataTypeFamily {
    fn from(value: FamilyOpt) -> Self {
        match value {
            FamilyOpt::Sequence => DataTypeFamily::Sequence,
            FamilyOpt::Text => DataTypeFamily::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterOpt {
    /// Print a table for each scenario and a summary at the end.
    Summary,
    /// Keep reports in memory and print only the summary at the end.
    InMemory,
    /// Print nothing. Reports are still written to `--report-path` if given.
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Mark the failed candidate in the scenario report and carry on with the matrix.
    Skip,
    /// Stop after reporting the scenario in which the first failure happened.
    Abort,
}
