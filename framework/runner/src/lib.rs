mod cli;
mod definition;
mod init;
mod monitor;
mod progress;
mod run;
mod session;
mod types;

pub mod prelude {
    pub use crate::cli::{ContainerBenchCli, FailurePolicy, FamilyOpt, ReporterOpt};
    pub use crate::definition::{BenchmarkDefinitionBuilder, FamilyDefinition, WorkloadProvider};
    pub use crate::init::init;
    pub use crate::run::{run, RunOutcome};
    pub use crate::types::BenchResult;

    pub use container_bench_core::prelude::*;
    pub use container_bench_instruments::{
        default_counters, unavailable_counters, Bench, BenchConfig, CounterFactory, CounterSample,
        PerformanceCounters,
    };
    pub use container_bench_summary_model::{
        CandidateOutcome, CandidateResult, CandidateTiming, RunSummary, ScenarioReport,
    };
}
