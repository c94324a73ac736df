use crate::definition::{FamilyDefinition, WorkloadProvider};
use container_bench_core::prelude::{
    Candidate, ConfigurationError, ScenarioId, WorkloadError, WorkloadFailure,
};
use container_bench_instruments::{Bench, BenchConfig, CounterFactory};
use container_bench_summary_model::ScenarioReport;
use std::sync::Once;

/// The result of one scenario: its report and every failure that happened while producing it.
#[derive(Debug)]
pub(crate) struct ScenarioOutcome {
    pub report: ScenarioReport,
    pub failures: Vec<WorkloadFailure>,
    /// The baseline run failed. It has no row in the report to carry the failure.
    pub baseline_failed: bool,
}

enum CellError {
    /// The workload failed for this candidate only.
    Workload(WorkloadError),
    /// The measurement library failed even without counters, the session cannot continue.
    SessionFatal(WorkloadError),
}

impl CellError {
    /// Unwrap the error, remembering why the session cannot continue if it is fatal.
    fn into_source(self, session_fatal: &mut Option<String>) -> WorkloadError {
        match self {
            CellError::Workload(source) => source,
            CellError::SessionFatal(source) => {
                *session_fatal = Some(source.to_string());
                source
            }
        }
    }
}

/// Run one scenario of one family in a fresh measurement session.
///
/// The baseline is run first and names the scenario. Then every candidate is run in order.
/// Failures are recorded as markers in the report so that no candidate is silently omitted.
pub(crate) fn run_scenario(
    family: &FamilyDefinition,
    scenario: ScenarioId,
    config: &BenchConfig,
    counter_factory: CounterFactory,
) -> Result<ScenarioOutcome, ConfigurationError> {
    let provider = family.provider.as_ref();
    let mut bench =
        Bench::new(family.family(), scenario, config.clone())?.with_counters(counter_factory);
    let mut failures = Vec::new();
    let mut session_fatal: Option<String> = None;
    let mut baseline_failed = false;

    let baseline = family.candidates.baseline();
    match measure_cell(&mut bench, provider, baseline, scenario) {
        Ok(title) => {
            if bench.baseline().is_none() {
                log::warn!(
                    "{} scenario {} did not measure its baseline",
                    family.family(),
                    scenario
                );
            }
            bench.set_title(title);
        }
        Err(e) => {
            let source = e.into_source(&mut session_fatal);
            let failure = WorkloadFailure {
                family: family.family(),
                scenario,
                candidate: baseline.display_label().to_string(),
                source,
            };
            log::error!("{failure}");
            bench.set_title(format!("{} scenario {}", family.family(), scenario));
            failures.push(failure);
            baseline_failed = true;
        }
    }

    for candidate in family.candidates.measured() {
        let label = candidate.display_label();

        let result = match &session_fatal {
            Some(reason) => Err(CellError::Workload(WorkloadError::failed(format!(
                "session aborted: {reason}"
            )))),
            None => measure_cell(&mut bench, provider, candidate, scenario).and_then(|_| {
                if bench.has_record(label) {
                    Ok(())
                } else {
                    Err(CellError::Workload(WorkloadError::failed(
                        "provider did not record a measurement",
                    )))
                }
            }),
        };

        if let Err(e) = result {
            let source = e.into_source(&mut session_fatal);
            bench.record_failure(label, source.to_string());
            let failure = WorkloadFailure {
                family: family.family(),
                scenario,
                candidate: label.to_string(),
                source,
            };
            log::error!("{failure}");
            failures.push(failure);
        }
    }

    Ok(ScenarioOutcome {
        report: bench.finalize(),
        failures,
        baseline_failed,
    })
}

/// Run one candidate, retrying once without performance counters if they fail.
fn measure_cell(
    bench: &mut Bench,
    provider: &dyn WorkloadProvider,
    candidate: &Candidate,
    scenario: ScenarioId,
) -> Result<String, CellError> {
    let result = match provider.run(bench, candidate, scenario) {
        Err(WorkloadError::Measurement(e))
            if e.is_counter_failure() && bench.performance_counters_enabled() =>
        {
            warn_counters_disabled(bench, &e.to_string());
            bench.disable_performance_counters();
            provider.run(bench, candidate, scenario)
        }
        result => result,
    };

    result.map_err(|e| {
        if matches!(&e, WorkloadError::Measurement(m) if m.is_counter_failure()) {
            CellError::SessionFatal(e)
        } else {
            CellError::Workload(e)
        }
    })
}

fn warn_counters_disabled(bench: &Bench, reason: &str) {
    static FIRST: Once = Once::new();

    let mut warned = false;
    FIRST.call_once(|| {
        log::warn!("{reason}, measuring without performance counters");
        warned = true;
    });
    if !warned {
        log::debug!(
            "{} scenario {}: {reason}, measuring without performance counters",
            bench.family(),
            bench.scenario()
        );
    }
}
