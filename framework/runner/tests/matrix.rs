use container_bench_runner::prelude::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

type CallLog = Arc<Mutex<Vec<(DataTypeFamily, u32, Option<String>)>>>;

/// Records every call and measures a trivial workload.
struct RecordingProvider {
    family: DataTypeFamily,
    calls: CallLog,
    fail_at: Option<(u32, &'static str)>,
}

impl RecordingProvider {
    fn new(family: DataTypeFamily, calls: CallLog) -> Self {
        Self {
            family,
            calls,
            fail_at: None,
        }
    }

    fn failing_at(mut self, scenario: u32, label: &'static str) -> Self {
        self.fail_at = Some((scenario, label));
        self
    }
}

impl WorkloadProvider for RecordingProvider {
    fn family(&self) -> DataTypeFamily {
        self.family
    }

    fn scenario_count(&self) -> u32 {
        DEFAULT_SCENARIO_COUNT
    }

    fn run(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
        scenario: ScenarioId,
    ) -> Result<String, WorkloadError> {
        self.calls.lock().push((
            self.family,
            scenario.get(),
            candidate.label().map(str::to_string),
        ));

        if let Some((fail_scenario, fail_label)) = self.fail_at {
            if scenario.get() == fail_scenario && candidate.display_label() == fail_label {
                return Err(WorkloadError::failed("injected failure"));
            }
        }

        let mut values = Vec::new();
        let workload = || {
            values.push(scenario.get());
            values.clear();
        };
        match candidate.label() {
            None => bench.measure_baseline(workload)?,
            Some(label) => bench.measure(label, workload)?,
        }

        Ok(format!("{} workload #{}", self.family, scenario))
    }
}

fn sample_cli_cfg() -> ContainerBenchCli {
    ContainerBenchCli {
        family: vec![],
        scenario_count: None,
        fast: false,
        clock_resolution_multiple: None,
        no_perf_counters: false,
        no_progress: true,
        reporter: ReporterOpt::InMemory,
        report_path: None,
        run_summary_path: None,
        run_id: None,
        on_failure: FailurePolicy::Skip,
    }
}

fn quick_config() -> BenchConfig {
    BenchConfig::default()
        .clock_resolution_multiple(1)
        .relative(true)
        .epochs(3)
        .max_epoch_time(Duration::from_micros(20))
}

fn sequence_candidates() -> CandidateSet {
    CandidateSet::new(DataTypeFamily::Sequence)
        .with_reference("std", ContainerKind::StdVec)
        .unwrap()
        .with_subject("custom", ContainerKind::SmallVec16)
        .unwrap()
}

fn text_candidates() -> CandidateSet {
    CandidateSet::new(DataTypeFamily::Text)
        .with_reference("std", ContainerKind::StdString)
        .unwrap()
        .with_subject("inline24", ContainerKind::InlineString24)
        .unwrap()
        .with_subject("inline64", ContainerKind::InlineString64)
        .unwrap()
}

fn full_matrix(calls: &CallLog, cli: ContainerBenchCli) -> BenchmarkDefinitionBuilder {
    BenchmarkDefinitionBuilder::new("full_matrix", cli)
        .with_bench_config(quick_config())
        .use_family(
            RecordingProvider::new(DataTypeFamily::Sequence, calls.clone()),
            sequence_candidates(),
        )
        .use_family(
            RecordingProvider::new(DataTypeFamily::Text, calls.clone()),
            text_candidates(),
        )
}

#[test]
fn baseline_runs_first_and_once_per_scenario() {
    let calls = CallLog::default();

    let outcome = run(full_matrix(&calls, sample_cli_cfg())).unwrap();
    assert_eq!(128, outcome.summary.reports_emitted);

    let calls = calls.lock();
    let mut expected = Vec::new();
    for scenario in 0..64 {
        expected.push((DataTypeFamily::Sequence, scenario, None));
        expected.push((DataTypeFamily::Sequence, scenario, Some("std".to_string())));
        expected.push((DataTypeFamily::Sequence, scenario, Some("custom".to_string())));
    }
    for scenario in 0..64 {
        expected.push((DataTypeFamily::Text, scenario, None));
        expected.push((DataTypeFamily::Text, scenario, Some("std".to_string())));
        expected.push((DataTypeFamily::Text, scenario, Some("inline24".to_string())));
        expected.push((DataTypeFamily::Text, scenario, Some("inline64".to_string())));
    }
    assert_eq!(expected, *calls);
}

#[test]
fn reports_list_candidates_in_order_without_baseline() {
    let calls = CallLog::default();

    let reports = run(full_matrix(&calls, sample_cli_cfg()))
        .unwrap()
        .reports
        .unwrap();

    assert_eq!(128, reports.len());
    for report in &reports {
        let expected = match report.family {
            DataTypeFamily::Sequence => vec!["std", "custom"],
            DataTypeFamily::Text => vec!["std", "inline24", "inline64"],
        };
        assert_eq!(expected, report.labels());
        assert_eq!(
            format!("{} workload #{}", report.family, report.scenario),
            report.title
        );
        assert!(report.baseline_ns_per_op.is_some());
        assert_eq!(Some("std".to_string()), report.reference);
    }
}

#[test]
fn scenario_zero_end_to_end() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(1);
    cli.family = vec![FamilyOpt::Sequence];

    let reports = run(full_matrix(&calls, cli)).unwrap().reports.unwrap();

    assert_eq!(1, reports.len());
    let report = &reports[0];
    assert_eq!(DataTypeFamily::Sequence, report.family);
    assert_eq!(0, report.scenario);
    assert_eq!("sequence workload #0", report.title);
    assert_eq!(vec!["std", "custom"], report.labels());
    assert_eq!(Some(1.0), report.candidate("std").unwrap().ratio());

    let std_ns = report
        .candidate("std")
        .unwrap()
        .timing()
        .unwrap()
        .median_ns_per_op;
    let custom = report.candidate("custom").unwrap().timing().unwrap();
    if std_ns > 0.0 {
        let expected = custom.median_ns_per_op / std_ns;
        assert!((custom.ratio.unwrap() - expected).abs() < 1e-9);
    }
}

#[test]
fn failure_does_not_prevent_later_scenarios() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(7);
    cli.family = vec![FamilyOpt::Sequence];

    let builder = BenchmarkDefinitionBuilder::new("injected_failure", cli)
        .with_bench_config(quick_config())
        .use_family(
            RecordingProvider::new(DataTypeFamily::Sequence, calls.clone()).failing_at(5, "custom"),
            sequence_candidates(),
        );

    let outcome = run(builder).unwrap();
    let reports = outcome.reports.unwrap();

    assert_eq!(7, reports.len());
    assert_eq!(1, outcome.summary.failures);

    let failed = &reports[5];
    assert_eq!(vec!["std", "custom"], failed.labels());
    assert!(failed.candidate("custom").unwrap().is_failed());
    assert!(!failed.candidate("std").unwrap().is_failed());
    assert_eq!(Some(1.0), failed.candidate("std").unwrap().ratio());

    let after = &reports[6];
    assert_eq!(6, after.scenario);
    assert_eq!(0, after.failures().count());
}

#[test]
fn failed_baseline_falls_back_to_generic_title() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(1);
    cli.family = vec![FamilyOpt::Sequence];

    let builder = BenchmarkDefinitionBuilder::new("baseline_failure", cli)
        .with_bench_config(quick_config())
        .use_family(
            RecordingProvider::new(DataTypeFamily::Sequence, calls.clone())
                .failing_at(0, "<baseline>"),
            sequence_candidates(),
        );

    let outcome = run(builder).unwrap();
    let report = &outcome.reports.unwrap()[0];

    assert_eq!("sequence scenario 0", report.title);
    assert_eq!(None, report.baseline_ns_per_op);
    assert_eq!(0, report.failures().count());
    assert_eq!(1, outcome.summary.failures);
}

#[test]
fn abort_policy_stops_after_reporting_failed_scenario() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(10);
    cli.family = vec![FamilyOpt::Sequence];
    cli.on_failure = FailurePolicy::Abort;

    let builder = BenchmarkDefinitionBuilder::new("abort", cli)
        .with_bench_config(quick_config())
        .use_family(
            RecordingProvider::new(DataTypeFamily::Sequence, calls.clone()).failing_at(5, "custom"),
            sequence_candidates(),
        );

    let err = run(builder).unwrap_err();
    let failure = err.downcast_ref::<WorkloadFailure>().unwrap();
    assert_eq!(DataTypeFamily::Sequence, failure.family);
    assert_eq!(ScenarioId::new(5), failure.scenario);
    assert_eq!("custom", failure.candidate);

    let max_scenario = calls.lock().iter().map(|(_, s, _)| *s).max().unwrap();
    assert_eq!(5, max_scenario);
}

#[test]
fn repeated_runs_have_same_titles_and_order() {
    let calls = CallLog::default();

    let first = run(full_matrix(&calls, sample_cli_cfg()))
        .unwrap()
        .reports
        .unwrap();
    let second = run(full_matrix(&calls, sample_cli_cfg()))
        .unwrap()
        .reports
        .unwrap();

    let shape = |reports: &[ScenarioReport]| {
        reports
            .iter()
            .map(|r| {
                (
                    r.family,
                    r.scenario,
                    r.title.clone(),
                    r.labels().into_iter().map(str::to_string).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn counters_unavailable_degrades_to_wall_time() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(2);

    let builder = full_matrix(&calls, cli)
        .with_bench_config(quick_config().performance_counters(true))
        .with_counters(unavailable_counters);

    let outcome = run(builder).unwrap();
    let reports = outcome.reports.unwrap();

    assert_eq!(0, outcome.summary.failures);
    assert_eq!(4, reports.len());
    for report in &reports {
        assert!(!report.counters_enabled);
        assert_eq!(0, report.failures().count());
    }

    // The baseline is retried once without counters in every session.
    let baseline_calls = calls
        .lock()
        .iter()
        .filter(|(_, _, label)| label.is_none())
        .count();
    assert_eq!(8, baseline_calls);
}

struct FixedCounters;

impl PerformanceCounters for FixedCounters {
    fn start(&mut self) -> Result<(), MeasurementError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<CounterSample, MeasurementError> {
        Ok(CounterSample {
            instructions: 10,
            cycles: 10,
        })
    }
}

fn fixed_counters() -> Result<Box<dyn PerformanceCounters>, MeasurementError> {
    Ok(Box::new(FixedCounters))
}

#[test]
fn counters_from_injected_backend_are_reported() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(1);
    cli.family = vec![FamilyOpt::Text];

    let builder = full_matrix(&calls, cli)
        .with_bench_config(quick_config().performance_counters(true))
        .with_counters(fixed_counters);

    let reports = run(builder).unwrap().reports.unwrap();

    assert!(reports[0].counters_enabled);
    let timing = reports[0].candidate("std").unwrap().timing().unwrap();
    assert!(timing.counters.is_some());
}

#[test]
fn platform_counters_sample_or_degrade_to_wall_time() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(1);

    let builder =
        full_matrix(&calls, cli).with_bench_config(quick_config().performance_counters(true));

    let outcome = run(builder).unwrap();

    assert_eq!(0, outcome.summary.failures);
    for report in outcome.reports.unwrap() {
        assert_eq!(0, report.failures().count());
        for candidate in &report.candidates {
            let timing = candidate.timing().unwrap();
            assert_eq!(report.counters_enabled, timing.counters.is_some());
        }
    }
}

/// Fails with a measurement library error on every call, even without counters.
struct FatalProvider {
    calls: CallLog,
}

impl WorkloadProvider for FatalProvider {
    fn family(&self) -> DataTypeFamily {
        DataTypeFamily::Sequence
    }

    fn scenario_count(&self) -> u32 {
        DEFAULT_SCENARIO_COUNT
    }

    fn run(
        &self,
        _bench: &mut Bench,
        candidate: &Candidate,
        scenario: ScenarioId,
    ) -> Result<String, WorkloadError> {
        self.calls.lock().push((
            DataTypeFamily::Sequence,
            scenario.get(),
            candidate.label().map(str::to_string),
        ));
        if scenario.get() == 0 && candidate.label() == Some("std") {
            return Err(MeasurementError::CounterSampling("device gone".to_string()).into());
        }
        Ok(format!("fatal #{scenario}"))
    }
}

#[test]
fn measurement_library_failure_is_fatal_for_session_only() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(2);

    let builder = BenchmarkDefinitionBuilder::new("fatal", cli)
        .with_bench_config(quick_config())
        .use_family(
            FatalProvider {
                calls: calls.clone(),
            },
            sequence_candidates(),
        );

    let outcome = run(builder).unwrap();
    let reports = outcome.reports.unwrap();

    assert_eq!(2, reports.len());
    let fatal = &reports[0];
    assert_eq!(vec!["std", "custom"], fatal.labels());
    assert!(fatal.candidate("std").unwrap().is_failed());
    assert!(fatal.candidate("custom").unwrap().is_failed());

    // The provider never records measurements, so the second session marks both candidates as
    // failed too, but it still runs them.
    let second_session_calls = calls.lock().iter().filter(|(_, s, _)| *s == 1).count();
    assert_eq!(3, second_session_calls);
    // In the first session, `custom` is never run after the fatal error.
    let first_session_custom = calls
        .lock()
        .iter()
        .filter(|(_, s, l)| *s == 0 && l.as_deref() == Some("custom"))
        .count();
    assert_eq!(0, first_session_custom);
}

#[test]
fn reject_invalid_configuration_before_measuring() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.clock_resolution_multiple = Some(0);

    let result = run(full_matrix(&calls, cli));

    assert!(result.is_err());
    assert!(calls.lock().is_empty());
}

#[test]
fn reject_scenario_count_beyond_provider() {
    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(65);

    let err = run(full_matrix(&calls, cli)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::ScenarioCount { requested: 65, .. })
    ));
    assert!(calls.lock().is_empty());
}

#[test]
fn reject_duplicate_family() {
    let calls = CallLog::default();

    let builder = full_matrix(&calls, sample_cli_cfg()).use_family(
        RecordingProvider::new(DataTypeFamily::Text, calls.clone()),
        text_candidates(),
    );

    let err = run(builder).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::DuplicateFamily(DataTypeFamily::Text))
    ));
}

#[test]
fn write_run_summary_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("run_summary.jsonl");
    let report_path = dir.path().join("reports.jsonl");

    let calls = CallLog::default();
    let mut cli = sample_cli_cfg();
    cli.scenario_count = Some(3);
    cli.reporter = ReporterOpt::Noop;
    cli.run_id = Some("test-run".to_string());
    cli.run_summary_path = Some(summary_path.clone());
    cli.report_path = Some(report_path.clone());

    let outcome = run(full_matrix(&calls, cli)).unwrap();
    assert!(outcome.reports.is_none());

    let summaries = container_bench_summary_model::load_summary_runs(&summary_path).unwrap();
    assert_eq!(1, summaries.len());
    assert_eq!("test-run", summaries[0].run_id);
    assert_eq!(6, summaries[0].reports_emitted);
    assert_eq!(
        vec!["std".to_string(), "custom".to_string()],
        summaries[0].candidates[&DataTypeFamily::Sequence]
    );

    let reports = container_bench_summary_model::load_scenario_reports(&report_path).unwrap();
    assert_eq!(6, reports.len());
}
