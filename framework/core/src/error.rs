use crate::candidate::ContainerKind;
use crate::scenario::{DataTypeFamily, ScenarioId};

/// Invalid configuration, detected before any measurement begins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("clock resolution multiple must be at least 1, got {0}")]
    ClockResolutionMultiple(u64),
    #[error("at least one epoch is required per measurement")]
    NoEpochs,
    #[error("at least one iteration is required per epoch")]
    NoEpochIterations,
    #[error("minimum epoch time {min:?} exceeds maximum epoch time {max:?}")]
    EpochTimeBounds {
        min: std::time::Duration,
        max: std::time::Duration,
    },
    #[error("scenario count must be in 1..={available} for the {family} family, got {requested}")]
    ScenarioCount {
        family: DataTypeFamily,
        requested: u32,
        available: u32,
    },
    #[error("candidate labels must not be empty ({0} family)")]
    EmptyLabel(DataTypeFamily),
    #[error("candidate `{label}` uses the null container, which is reserved for the baseline")]
    NullCandidate { label: String },
    #[error("candidate `{label}` uses {kind:?} which does not belong to the {family} family")]
    FamilyMismatch {
        label: String,
        kind: ContainerKind,
        family: DataTypeFamily,
    },
    #[error("candidate `{label}` is defined more than once for the {family} family")]
    DuplicateLabel {
        label: String,
        family: DataTypeFamily,
    },
    #[error("the {0} family has no reference candidate")]
    MissingReference(DataTypeFamily),
    #[error("the {0} family has no subject candidate")]
    MissingSubject(DataTypeFamily),
    #[error("the {0} family is registered more than once")]
    DuplicateFamily(DataTypeFamily),
    #[error("provider for the {provider} family was registered with candidates for the {candidates} family")]
    ProviderMismatch {
        provider: DataTypeFamily,
        candidates: DataTypeFamily,
    },
    #[error("no families selected to benchmark")]
    NoFamilies,
}

/// Failure of the measurement library itself, independent of the workload being measured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasurementError {
    #[error("performance counters unavailable: {0}")]
    CountersUnavailable(String),
    #[error("performance counters failed while sampling: {0}")]
    CounterSampling(String),
    #[error("workload panicked: {0}")]
    WorkloadPanicked(String),
}

impl MeasurementError {
    /// Errors that go away by measuring without performance counters.
    pub fn is_counter_failure(&self) -> bool {
        matches!(
            self,
            MeasurementError::CountersUnavailable(_) | MeasurementError::CounterSampling(_)
        )
    }
}

/// Error returned by a workload provider for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkloadError {
    #[error("unknown scenario {0}")]
    UnknownScenario(ScenarioId),
    #[error("container {kind:?} is not supported by the {family} workloads")]
    UnsupportedContainer {
        kind: ContainerKind,
        family: DataTypeFamily,
    },
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

impl WorkloadError {
    pub fn failed(reason: impl Into<String>) -> Self {
        WorkloadError::Failed(reason.into())
    }
}

/// A provider failed for one cell of the benchmark matrix.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("{family} scenario {scenario} failed for candidate `{candidate}`: {source}")]
pub struct WorkloadFailure {
    pub family: DataTypeFamily,
    pub scenario: ScenarioId,
    pub candidate: String,
    pub source: WorkloadError,
}
