use crate::report::{float2, ratio_display};
use container_bench_summary_model::{CandidateOutcome, ScenarioReport};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Render the comparison table of one scenario.
///
/// The counter columns are only present when the session sampled performance counters.
pub fn scenario_table(report: &ScenarioReport) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["relative", "ns/op", "op/s", "err%"];
    if report.counters_enabled {
        header.extend(["ins/op", "cyc/op", "IPC"]);
    }
    header.extend(["total ms", "candidate"]);
    builder.push_record(header);

    for candidate in &report.candidates {
        let mut record = Vec::with_capacity(9);
        match &candidate.outcome {
            CandidateOutcome::Measured(timing) => {
                record.push(ratio_display(&timing.ratio));
                record.push(float2(&timing.median_ns_per_op));
                record.push(format!("{:.0}", timing.ops_per_second()));
                record.push(format!("{:.1}%", timing.error_pct));
                if report.counters_enabled {
                    match &timing.counters {
                        Some(counters) => {
                            record.push(float2(&counters.instructions_per_op));
                            record.push(float2(&counters.cycles_per_op));
                            record.push(float2(&counters.ipc()));
                        }
                        None => record.extend(["-".to_string(), "-".to_string(), "-".to_string()]),
                    }
                }
                record.push(float2(&(timing.total_time_ns as f64 / 1_000_000.0)));
                record.push(candidate.label.clone());
            }
            CandidateOutcome::Failed { reason } => {
                let columns = if report.counters_enabled { 8 } else { 5 };
                record.extend(std::iter::repeat("-".to_string()).take(columns));
                record.push(format!("{} (FAILED: {})", candidate.label, reason));
            }
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

pub fn print_scenario(report: &ScenarioReport) {
    println!(
        "\n{} #{}: {}",
        report.family, report.scenario, report.title
    );
    if let Some(baseline) = report.baseline_ns_per_op {
        println!("baseline overhead: {} ns/op", float2(&baseline));
    }
    println!("{}", scenario_table(report));
}
