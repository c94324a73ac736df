//! Workload providers for the container benchmark harness.
//!
//! Each provider maps a [ScenarioId] to a fixed sequence of container operations and runs it
//! against the container selected by a [Candidate], measuring it with a [Bench].

pub mod containers;
mod sequence;
mod text;

pub use sequence::SequenceWorkloads;
pub use text::TextWorkloads;

use container_bench_runner::prelude::{
    Bench, Candidate, DataTypeFamily, MeasurementError, ScenarioId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Measure `workload` for `candidate`, as the baseline when it is the null candidate.
fn measure_candidate<F: FnMut()>(
    bench: &mut Bench,
    candidate: &Candidate,
    workload: F,
) -> Result<(), MeasurementError> {
    log::trace!(
        "{} scenario {}: measuring `{}`",
        bench.family(),
        bench.scenario(),
        candidate.display_label()
    );
    match candidate.label() {
        None => bench.measure_baseline(workload),
        Some(label) => bench.measure(label, workload),
    }
}

/// The random source for a scenario's input data. The same scenario always gets the same stream.
fn scenario_rng(family: DataTypeFamily, scenario: ScenarioId) -> StdRng {
    let family = match family {
        DataTypeFamily::Sequence => 1u64,
        DataTypeFamily::Text => 2u64,
    };
    StdRng::seed_from_u64(0x5eed_0000_0000_0000 | family << 32 | u64::from(scenario.get()))
}
