use container_bench_runner::prelude::*;
use container_workloads::{SequenceWorkloads, TextWorkloads};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn quick_config() -> BenchConfig {
    BenchConfig::default()
        .clock_resolution_multiple(1)
        .relative(true)
        .epochs(2)
        .max_epoch_time(Duration::from_micros(10))
}

fn sequence_candidates() -> CandidateSet {
    CandidateSet::new(DataTypeFamily::Sequence)
        .with_reference("std", ContainerKind::StdVec)
        .unwrap()
        .with_subject("small16", ContainerKind::SmallVec16)
        .unwrap()
        .with_subject("small64", ContainerKind::SmallVec64)
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

/// Runs every candidate of `candidates` on `scenario` and returns the names the provider gave.
fn run_all(
    provider: &dyn WorkloadProvider,
    candidates: &CandidateSet,
    scenario: ScenarioId,
) -> (Vec<String>, ScenarioReport) {
    let mut bench = Bench::new(provider.family(), scenario, quick_config()).unwrap();
    let mut names = Vec::new();
    names.push(
        provider
            .run(&mut bench, candidates.baseline(), scenario)
            .unwrap(),
    );
    for candidate in candidates.measured() {
        names.push(provider.run(&mut bench, candidate, scenario).unwrap());
    }
    bench.set_title(names[0].clone());

    (names, bench.finalize())
}

fn check_every_scenario(provider: &dyn WorkloadProvider, candidates: &CandidateSet) {
    assert_eq!(DEFAULT_SCENARIO_COUNT, provider.scenario_count());

    for scenario in ScenarioId::range(provider.scenario_count()) {
        let (names, report) = run_all(provider, candidates, scenario);

        assert!(
            names.iter().all(|name| name == &names[0]),
            "scenario {scenario} is named differently per candidate: {names:?}"
        );
        assert!(report.baseline_ns_per_op.is_some());
        assert_eq!(candidates.labels(), report.labels());
        assert_eq!(0, report.failures().count(), "scenario {scenario}");
        assert_eq!(Some(1.0), report.candidate("std").unwrap().ratio());
    }
}

#[test]
fn every_sequence_scenario_runs_on_every_container() {
    check_every_scenario(&SequenceWorkloads, &sequence_candidates());
}

#[test]
fn every_text_scenario_runs_on_every_container() {
    check_every_scenario(&TextWorkloads, &text_candidates());
}

#[test]
fn names_do_not_depend_on_the_run() {
    let candidates = sequence_candidates();
    let (first, _) = run_all(&SequenceWorkloads, &candidates, ScenarioId::new(20));
    let (second, _) = run_all(&SequenceWorkloads, &candidates, ScenarioId::new(20));

    assert_eq!(first, second);
    assert_eq!(
        SequenceWorkloads.scenario_name(ScenarioId::new(20)).unwrap(),
        first[0]
    );
}

#[test]
fn unknown_scenario_is_rejected() {
    let scenario = ScenarioId::new(DEFAULT_SCENARIO_COUNT);
    let mut bench = Bench::new(DataTypeFamily::Text, scenario, quick_config()).unwrap();

    let err = TextWorkloads
        .run(&mut bench, &Candidate::baseline(), scenario)
        .unwrap_err();

    assert!(matches!(err, WorkloadError::UnknownScenario(id) if id == scenario));
}

#[test]
fn container_from_another_family_is_rejected() {
    let scenario = ScenarioId::new(0);
    let mut bench = Bench::new(DataTypeFamily::Sequence, scenario, quick_config()).unwrap();

    let err = SequenceWorkloads
        .run(
            &mut bench,
            &Candidate::subject("string", ContainerKind::StdString),
            scenario,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        WorkloadError::UnsupportedContainer {
            kind: ContainerKind::StdString,
            family: DataTypeFamily::Sequence,
        }
    ));
    assert!(!bench.has_record("string"));
}

#[test]
fn scenario_zero_through_the_runner() {
    let cli = ContainerBenchCli {
        family: vec![FamilyOpt::Sequence],
        scenario_count: Some(1),
        fast: false,
        clock_resolution_multiple: None,
        no_perf_counters: true,
        no_progress: true,
        reporter: ReporterOpt::InMemory,
        report_path: None,
        run_summary_path: None,
        run_id: None,
        on_failure: FailurePolicy::Skip,
    };
    let candidates = CandidateSet::new(DataTypeFamily::Sequence)
        .with_reference("std", ContainerKind::StdVec)
        .unwrap()
        .with_subject("custom", ContainerKind::SmallVec16)
        .unwrap();
    let builder = BenchmarkDefinitionBuilder::new("workloads_scenario_zero", cli)
        .with_bench_config(quick_config())
        .use_family(SequenceWorkloads, candidates);

    let outcome = run(builder).unwrap();
    let reports = outcome.reports.unwrap();

    assert_eq!(1, reports.len());
    assert_eq!("sequence<u32>: push 4 then clear", reports[0].title);
    assert_eq!(vec!["std", "custom"], reports[0].labels());
    assert_eq!(0, outcome.summary.failures);
}

#[test]
fn baseline_with_platform_counters_measures_or_reports_a_counter_failure() {
    let scenario = ScenarioId::new(0);
    let mut bench = Bench::new(
        DataTypeFamily::Sequence,
        scenario,
        quick_config().performance_counters(true),
    )
    .unwrap();

    match SequenceWorkloads.run(&mut bench, sequence_candidates().baseline(), scenario) {
        Ok(name) => assert_eq!("sequence<u32>: push 4 then clear", name),
        Err(WorkloadError::Measurement(e)) => assert!(e.is_counter_failure()),
        Err(e) => panic!("unexpected error: {e}"),
    }
}
