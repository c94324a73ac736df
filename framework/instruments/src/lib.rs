//! The measurement library for the container benchmark harness.
//!
//! A [Bench] is one measurement session: it is created per scenario with a [BenchConfig],
//! measures the baseline and each candidate, and is finalized into a scenario report which is
//! handed to a [Reporter].

mod bench;
mod clock;
mod config;
mod counters;
mod report;
mod stats;

pub use bench::{Bench, Measurement};
pub use clock::clock_resolution;
pub use config::{BenchConfig, ACCURATE_CLOCK_RESOLUTION_MULTIPLE, FAST_CLOCK_RESOLUTION_MULTIPLE};
#[cfg(target_os = "linux")]
pub use counters::perf_event_counters;
pub use counters::{
    default_counters, unavailable_counters, CounterFactory, CounterSample, PerformanceCounters,
};
pub use report::{
    aggregate_reports, AggregateRow, InMemoryReportCollector, JsonlReportCollector,
    ReportCollector, ReportConfig, Reporter, SummaryReportCollector,
};
pub use stats::{median, median_absolute_percentage_error};
