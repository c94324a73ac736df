//! Sequence family workloads.
//!
//! A scenario id decodes as `id % 8` for the operation, `(id / 8) % 4` for the element count and
//! `id / 32` for the element type.

use crate::containers::{
    Element, NullSequenceFactory, Sequence, SequenceFactory, SmallVecFactory, StdVecFactory,
};
use crate::{measure_candidate, scenario_rng};
use container_bench_runner::prelude::*;
use rand::Rng;
use std::hint::black_box;

const SCENARIO_COUNT: u32 = 64;
const SIZES: [usize; 4] = [4, 16, 64, 256];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    PushThenClear,
    ReserveThenPush,
    Clone,
    SequentialSum,
    RandomRead,
    InsertFront,
    DrainFront,
    ExtendThenTruncate,
}

const OPERATIONS: [Operation; 8] = [
    Operation::PushThenClear,
    Operation::ReserveThenPush,
    Operation::Clone,
    Operation::SequentialSum,
    Operation::RandomRead,
    Operation::InsertFront,
    Operation::DrainFront,
    Operation::ExtendThenTruncate,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementType {
    U32,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SequenceScenario {
    id: ScenarioId,
    operation: Operation,
    size: usize,
    element: ElementType,
}

impl SequenceScenario {
    fn decode(id: ScenarioId) -> Option<Self> {
        let raw = id.get();
        if raw >= SCENARIO_COUNT {
            return None;
        }

        Some(Self {
            id,
            operation: OPERATIONS[(raw % 8) as usize],
            size: SIZES[((raw / 8) % 4) as usize],
            element: if raw / 32 == 0 {
                ElementType::U32
            } else {
                ElementType::String
            },
        })
    }

    fn name(&self) -> String {
        let element = match self.element {
            ElementType::U32 => u32::NAME,
            ElementType::String => String::NAME,
        };
        let n = self.size;
        let operation = match self.operation {
            Operation::PushThenClear => format!("push {n} then clear"),
            Operation::ReserveThenPush => format!("reserve {n} then push"),
            Operation::Clone => format!("clone {n}"),
            Operation::SequentialSum => format!("sum {n} in order"),
            Operation::RandomRead => format!("read {n} at random"),
            Operation::InsertFront => format!("insert {n} at front"),
            Operation::DrainFront => format!("fill {n} then remove from front"),
            Operation::ExtendThenTruncate => format!("extend by {n} then truncate"),
        };

        format!("sequence<{element}>: {operation}")
    }

    fn run<F: SequenceFactory>(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
    ) -> Result<(), MeasurementError> {
        match self.element {
            ElementType::U32 => self.run_with::<u32, F::Seq<u32>>(bench, candidate),
            ElementType::String => self.run_with::<String, F::Seq<String>>(bench, candidate),
        }
    }

    fn run_with<T: Element, S: Sequence<T>>(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
    ) -> Result<(), MeasurementError> {
        let n = self.size;
        let source: Vec<T> = (0..n).map(T::nth).collect();
        let mut filled = S::with_capacity(n);
        filled.extend_from_slice(&source);

        match self.operation {
            Operation::PushThenClear => measure_candidate(bench, candidate, || {
                let mut seq = S::new();
                for value in &source {
                    seq.push(value.clone());
                }
                black_box(&seq);
                seq.clear();
                black_box(seq);
            }),
            Operation::ReserveThenPush => measure_candidate(bench, candidate, || {
                let mut seq = S::new();
                seq.reserve(n);
                for value in &source {
                    seq.push(value.clone());
                }
                black_box(seq);
            }),
            Operation::Clone => measure_candidate(bench, candidate, || {
                black_box(black_box(&filled).clone());
            }),
            Operation::SequentialSum => measure_candidate(bench, candidate, || {
                let mut sum = 0u64;
                black_box(&filled).for_each(|value| sum = sum.wrapping_add(value.weight()));
                black_box(sum);
            }),
            Operation::RandomRead => {
                let mut rng = scenario_rng(DataTypeFamily::Sequence, self.id);
                let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                measure_candidate(bench, candidate, || {
                    let seq = black_box(&filled);
                    let mut sum = 0u64;
                    for index in &indices {
                        if let Some(value) = seq.get(*index) {
                            sum = sum.wrapping_add(value.weight());
                        }
                    }
                    black_box(sum);
                })
            }
            Operation::InsertFront => measure_candidate(bench, candidate, || {
                let mut seq = S::new();
                for value in &source {
                    seq.insert(0, value.clone());
                }
                black_box(seq);
            }),
            Operation::DrainFront => measure_candidate(bench, candidate, || {
                let mut seq = S::new();
                seq.extend_from_slice(&source);
                while let Some(value) = seq.remove(0) {
                    black_box(value);
                }
            }),
            Operation::ExtendThenTruncate => {
                let mut seq = S::new();
                measure_candidate(bench, candidate, || {
                    seq.extend_from_slice(&source);
                    seq.truncate(n / 2);
                    seq.extend_from_slice(&source[n / 2..]);
                    black_box(&seq);
                    seq.clear();
                })
            }
        }
    }
}

/// The sequence family: `Vec`, `SmallVec` and the null sequence over `u32` and `String`
/// elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceWorkloads;

impl SequenceWorkloads {
    /// The name of `scenario` without running it.
    pub fn scenario_name(&self, scenario: ScenarioId) -> Result<String, WorkloadError> {
        SequenceScenario::decode(scenario)
            .map(|s| s.name())
            .ok_or(WorkloadError::UnknownScenario(scenario))
    }
}

impl WorkloadProvider for SequenceWorkloads {
    fn family(&self) -> DataTypeFamily {
        DataTypeFamily::Sequence
    }

    fn scenario_count(&self) -> u32 {
        SCENARIO_COUNT
    }

    fn run(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
        scenario: ScenarioId,
    ) -> Result<String, WorkloadError> {
        let workload =
            SequenceScenario::decode(scenario).ok_or(WorkloadError::UnknownScenario(scenario))?;

        match candidate.kind() {
            ContainerKind::Null => workload.run::<NullSequenceFactory>(bench, candidate)?,
            ContainerKind::StdVec => workload.run::<StdVecFactory>(bench, candidate)?,
            ContainerKind::SmallVec16 => workload.run::<SmallVecFactory<16>>(bench, candidate)?,
            ContainerKind::SmallVec64 => workload.run::<SmallVecFactory<64>>(bench, candidate)?,
            kind => {
                return Err(WorkloadError::UnsupportedContainer {
                    kind,
                    family: DataTypeFamily::Sequence,
                })
            }
        }

        Ok(workload.name())
    }
}
