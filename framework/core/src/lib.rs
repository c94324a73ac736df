mod candidate;
mod error;
mod scenario;
mod shutdown;

pub mod prelude {
    pub use crate::candidate::{Candidate, CandidateRole, CandidateSet, ContainerKind};
    pub use crate::error::{ConfigurationError, MeasurementError, WorkloadError, WorkloadFailure};
    pub use crate::scenario::{DataTypeFamily, ScenarioId, DEFAULT_SCENARIO_COUNT};
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
}
