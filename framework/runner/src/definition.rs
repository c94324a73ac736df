use crate::cli::{ContainerBenchCli, FailurePolicy, ReporterOpt};
use container_bench_core::prelude::{
    Candidate, CandidateSet, ConfigurationError, DataTypeFamily, ScenarioId, WorkloadError,
};
use container_bench_instruments::{
    default_counters, Bench, BenchConfig, CounterFactory, FAST_CLOCK_RESOLUTION_MULTIPLE,
};
use std::path::PathBuf;

/// Performs the workloads of one [DataTypeFamily].
///
/// Implementations must be reproducible: the same [ScenarioId] always denotes the same sequence
/// of container operations, for every candidate and across repeated calls, and always has the
/// same display name.
pub trait WorkloadProvider {
    fn family(&self) -> DataTypeFamily;

    /// The number of scenarios this provider defines. Valid ids are `0..scenario_count`.
    fn scenario_count(&self) -> u32;

    /// Run the workload for `scenario` against the container selected by `candidate`, and return
    /// the display name of the scenario.
    ///
    /// The baseline candidate must be measured with [Bench::measure_baseline], using a trivial
    /// substitute container with the same operation sequence. Any other candidate must be measured
    /// with [Bench::measure] under its label.
    fn run(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
        scenario: ScenarioId,
    ) -> Result<String, WorkloadError>;
}

/// A provider together with the candidates it is run against.
pub struct FamilyDefinition {
    pub provider: Box<dyn WorkloadProvider>,
    pub candidates: CandidateSet,
}

impl FamilyDefinition {
    pub fn family(&self) -> DataTypeFamily {
        self.candidates.family()
    }
}

/// The builder for a benchmark definition.
///
/// This must be used in the benchmark's `main` to define which families and candidates to run.
pub struct BenchmarkDefinitionBuilder {
    /// The name of the benchmark.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: ContainerBenchCli,
    /// Used when the CLI does not ask for a specific number of scenarios. If neither is set then
    /// every scenario that the providers define is run.
    default_scenario_count: Option<u32>,
    /// The session configuration before CLI overrides. Defaults to [BenchConfig::accurate].
    bench_config: Option<BenchConfig>,
    counter_factory: CounterFactory,
    families: Vec<FamilyDefinition>,
}

pub struct BenchmarkDefinition {
    pub name: String,
    pub families: Vec<FamilyDefinition>,
    pub scenario_count: u32,
    pub bench_config: BenchConfig,
    pub counter_factory: CounterFactory,
    pub failure_policy: FailurePolicy,
    pub reporter: ReporterOpt,
    pub report_path: Option<PathBuf>,
    pub run_summary_path: Option<PathBuf>,
    pub run_id: Option<String>,
    pub no_progress: bool,
}

impl BenchmarkDefinition {
    pub fn total_cells(&self) -> u64 {
        self.families.len() as u64 * u64::from(self.scenario_count)
    }
}

impl BenchmarkDefinitionBuilder {
    pub fn new(name: &str, cli: ContainerBenchCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            default_scenario_count: None,
            bench_config: None,
            counter_factory: default_counters,
            families: Vec::new(),
        }
    }

    pub fn with_default_scenario_count(mut self, count: u32) -> Self {
        self.default_scenario_count = Some(count);
        self
    }

    pub fn with_bench_config(mut self, config: BenchConfig) -> Self {
        self.bench_config = Some(config);
        self
    }

    /// Set where performance counters come from. Without this, the platform's default backend
    /// is used, and sessions fall back to wall time only when it cannot be opened.
    pub fn with_counters(mut self, factory: CounterFactory) -> Self {
        self.counter_factory = factory;
        self
    }

    /// Register a family. Families run in registration order.
    pub fn use_family<P: WorkloadProvider + 'static>(
        mut self,
        provider: P,
        candidates: CandidateSet,
    ) -> Self {
        self.families.push(FamilyDefinition {
            provider: Box::new(provider),
            candidates,
        });
        self
    }

    pub(crate) fn build(self) -> Result<BenchmarkDefinition, ConfigurationError> {
        let mut seen = Vec::new();
        for family in &self.families {
            if family.provider.family() != family.candidates.family() {
                return Err(ConfigurationError::ProviderMismatch {
                    provider: family.provider.family(),
                    candidates: family.candidates.family(),
                });
            }
            if seen.contains(&family.family()) {
                return Err(ConfigurationError::DuplicateFamily(family.family()));
            }
            seen.push(family.family());
            family.candidates.validate()?;
        }

        let selected = self
            .cli
            .family
            .iter()
            .map(|f| DataTypeFamily::from(*f))
            .collect::<Vec<_>>();
        let families = self
            .families
            .into_iter()
            .filter(|f| selected.is_empty() || selected.contains(&f.family()))
            .collect::<Vec<_>>();
        if families.is_empty() {
            return Err(ConfigurationError::NoFamilies);
        }

        let available = families
            .iter()
            .map(|f| (f.family(), f.provider.scenario_count()))
            .min_by_key(|(_, count)| *count)
            .unwrap_or((DataTypeFamily::Sequence, 0));
        let scenario_count = self
            .cli
            .scenario_count
            .or(self.default_scenario_count)
            .unwrap_or(available.1);
        if scenario_count == 0 || scenario_count > available.1 {
            return Err(ConfigurationError::ScenarioCount {
                family: available.0,
                requested: scenario_count,
                available: available.1,
            });
        }

        let mut bench_config = self.bench_config.unwrap_or_else(BenchConfig::accurate);
        if self.cli.fast {
            bench_config = bench_config.clock_resolution_multiple(FAST_CLOCK_RESOLUTION_MULTIPLE);
        }
        if let Some(multiple) = self.cli.clock_resolution_multiple {
            bench_config = bench_config.clock_resolution_multiple(multiple);
        }
        if self.cli.no_perf_counters {
            bench_config = bench_config.performance_counters(false);
        }
        bench_config.validate()?;

        Ok(BenchmarkDefinition {
            name: self.name,
            families,
            scenario_count,
            bench_config,
            counter_factory: self.counter_factory,
            failure_policy: self.cli.on_failure,
            reporter: self.cli.reporter,
            report_path: self.cli.report_path,
            run_summary_path: self.cli.run_summary_path,
            run_id: self.cli.run_id,
            no_progress: self.cli.no_progress,
        })
    }
}
