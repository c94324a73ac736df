use crate::cli::{FailurePolicy, ReporterOpt};
use crate::definition::{BenchmarkDefinition, BenchmarkDefinitionBuilder};
use crate::monitor::start_monitor;
use crate::progress::MatrixProgress;
use crate::session::run_scenario;
use anyhow::Context;
use container_bench_core::prelude::{ScenarioId, ShutdownHandle};
use container_bench_instruments::{ReportConfig, Reporter};
use container_bench_summary_model::{
    append_run_summary, RunSummary, ScenarioReport, SessionSettings,
};
use std::collections::BTreeMap;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    /// Every scenario report, when the in-memory reporter was selected.
    pub reports: Option<Vec<ScenarioReport>>,
}

/// Run the full comparison matrix: every family, every scenario in ascending order, every
/// candidate in candidate set order.
///
/// Under [FailurePolicy::Skip] workload failures are logged and marked in the reports, and the run
/// still succeeds. Under [FailurePolicy::Abort] the first failure ends the run with an error,
/// after the scenario it happened in has been reported.
pub fn run(definition: BenchmarkDefinitionBuilder) -> anyhow::Result<RunOutcome> {
    let definition = definition
        .build()
        .context("Invalid benchmark configuration")?;

    log::info!("Running benchmark: {}", definition.name);

    let run_id = definition
        .run_id
        .clone()
        .unwrap_or_else(|| nanoid::nanoid!());
    let mut summary = RunSummary::new(
        run_id,
        definition.name.clone(),
        chrono::Utc::now().timestamp(),
        SessionSettings {
            clock_resolution_multiple: definition.bench_config.get_clock_resolution_multiple(),
            relative: definition.bench_config.is_relative(),
            performance_counters: definition.bench_config.has_performance_counters(),
            epochs: definition.bench_config.get_epochs(),
        },
        definition.scenario_count,
        definition
            .families
            .iter()
            .map(|f| (f.family(), f.candidates.labels()))
            .collect::<BTreeMap<_, _>>(),
        env!("CARGO_PKG_VERSION").to_string(),
    );

    let reporter = init_reporter(&definition);
    let shutdown_handle = ShutdownHandle::new();
    // Start the resource monitor to report other load on the machine which might lead to
    // misleading results.
    let monitor = start_monitor(shutdown_handle.new_listener());
    let progress = MatrixProgress::new(definition.total_cells(), !definition.no_progress);

    let result = run_matrix(&definition, &reporter, &progress, &mut summary);

    progress.finish();
    shutdown_handle.shutdown();
    if let Some(monitor) = monitor {
        if monitor.join().is_err() {
            log::warn!("Monitor thread panicked");
        }
    }

    reporter.finalize();

    if let Some(path) = &definition.run_summary_path {
        append_run_summary(&summary, path)
            .with_context(|| format!("Failed to write run summary to {}", path.display()))?;
    }

    result?;

    if summary.failures > 0 {
        log::warn!(
            "{} candidate measurements failed across {} scenario reports",
            summary.failures,
            summary.reports_emitted
        );
    }

    Ok(RunOutcome {
        summary,
        reports: reporter.in_memory_reports(),
    })
}

fn run_matrix(
    definition: &BenchmarkDefinition,
    reporter: &Reporter,
    progress: &MatrixProgress,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    for family in &definition.families {
        log::info!(
            "Benchmarking {} scenarios of the {} family with candidates {:?}",
            definition.scenario_count,
            family.family(),
            family.candidates.labels()
        );

        for scenario in ScenarioId::range(definition.scenario_count) {
            progress.start_scenario(family.family(), scenario);

            let outcome = run_scenario(
                family,
                scenario,
                &definition.bench_config,
                definition.counter_factory,
            )?;

            progress.suspend(|| reporter.add_scenario(&outcome.report));
            summary.record_report(&outcome.report);
            if outcome.baseline_failed {
                summary.record_baseline_failure();
            }
            progress.finish_scenario();

            if definition.failure_policy == FailurePolicy::Abort {
                if let Some(failure) = outcome.failures.into_iter().next() {
                    return Err(anyhow::Error::new(failure).context("Aborting benchmark matrix"));
                }
            }
        }
    }

    Ok(())
}

fn init_reporter(definition: &BenchmarkDefinition) -> Reporter {
    let config = match definition.reporter {
        ReporterOpt::Summary => ReportConfig::default().enable_summary(),
        ReporterOpt::InMemory => ReportConfig::default().enable_in_memory(),
        ReporterOpt::Noop => ReportConfig::default(),
    };

    match &definition.report_path {
        Some(path) => config.enable_jsonl(path.clone()),
        None => config,
    }
    .init()
}
