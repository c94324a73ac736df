use container_bench_core::prelude::DataTypeFamily;
use container_bench_summary_model::ScenarioReport;
use super::ratio_display;
use tabled::Tabled;

/// How one candidate fared across every scenario of a family.
#[derive(Tabled, Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub family: DataTypeFamily,
    pub candidate: String,
    /// Scenarios with a ratio for this candidate.
    pub measured: usize,
    pub failed: usize,
    #[tabled(rename = "geomean ratio", display = "ratio_display")]
    pub geomean_ratio: Option<f64>,
    #[tabled(rename = "best", display = "ratio_display")]
    pub best_ratio: Option<f64>,
    #[tabled(rename = "worst", display = "ratio_display")]
    pub worst_ratio: Option<f64>,
}

/// One row per (family, candidate), in order of first appearance.
pub fn aggregate_reports(reports: &[ScenarioReport]) -> Vec<AggregateRow> {
    let mut keys: Vec<(DataTypeFamily, String)> = Vec::new();
    for report in reports {
        for candidate in &report.candidates {
            let key = (report.family, candidate.label.clone());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys.into_iter()
        .map(|(family, label)| {
            let results = reports
                .iter()
                .filter(|r| r.family == family)
                .filter_map(|r| r.candidate(&label))
                .collect::<Vec<_>>();

            let ratios = results
                .iter()
                .filter_map(|c| c.ratio())
                .filter(|r| *r > 0.0 && r.is_finite())
                .collect::<Vec<_>>();

            let geomean_ratio = if ratios.is_empty() {
                None
            } else {
                let log_sum = ratios.iter().map(|r| r.ln()).sum::<f64>();
                Some((log_sum / ratios.len() as f64).exp())
            };

            AggregateRow {
                family,
                candidate: label,
                measured: ratios.len(),
                failed: results.iter().filter(|c| c.is_failed()).count(),
                geomean_ratio,
                best_ratio: ratios.iter().copied().reduce(f64::min),
                worst_ratio: ratios.iter().copied().reduce(f64::max),
            }
        })
        .collect()
}
