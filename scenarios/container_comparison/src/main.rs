use anyhow::Context;
use container_bench_runner::prelude::*;
use container_workloads::{SequenceWorkloads, TextWorkloads};

fn sequence_candidates() -> Result<CandidateSet, ConfigurationError> {
    CandidateSet::new(DataTypeFamily::Sequence)
        .with_reference("std::Vec", ContainerKind::StdVec)?
        .with_subject("SmallVec<16>", ContainerKind::SmallVec16)?
        .with_subject("SmallVec<64>", ContainerKind::SmallVec64)
}

fn text_candidates() -> Result<CandidateSet, ConfigurationError> {
    CandidateSet::new(DataTypeFamily::Text)
        .with_reference("std::String", ContainerKind::StdString)?
        .with_subject("InlineString<24>", ContainerKind::InlineString24)?
        .with_subject("InlineString<64>", ContainerKind::InlineString64)
}

fn main() -> BenchResult<()> {
    let cli = init();

    let builder = BenchmarkDefinitionBuilder::new(env!("CARGO_PKG_NAME"), cli)
        .with_default_scenario_count(DEFAULT_SCENARIO_COUNT)
        .use_family(
            SequenceWorkloads,
            sequence_candidates().context("Invalid sequence candidates")?,
        )
        .use_family(
            TextWorkloads,
            text_candidates().context("Invalid text candidates")?,
        );

    let outcome = run(builder)?;
    log::info!(
        "Emitted {} scenario reports with {} failures",
        outcome.summary.reports_emitted,
        outcome.summary.failures
    );

    Ok(())
}
