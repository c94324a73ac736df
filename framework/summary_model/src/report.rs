use container_bench_core::prelude::DataTypeFamily;
use serde::{Deserialize, Serialize};

/// The output of one measurement session: one scenario of one family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioReport {
    pub family: DataTypeFamily,
    pub scenario: u32,
    /// The display name returned by the workload provider for the baseline run.
    pub title: String,
    /// Median cost of the baseline-null workload, in nanoseconds per operation.
    ///
    /// This is the fixed overhead of the workload and is never shown as a candidate row.
    pub baseline_ns_per_op: Option<f64>,
    /// The label of the candidate that ratios are relative to.
    ///
    /// This is the first candidate that was measured successfully. It is `None` if relative
    /// reporting was disabled or no candidate could be measured.
    pub reference: Option<String>,
    /// Whether performance counters were sampled for this scenario.
    pub counters_enabled: bool,
    /// One entry per non-baseline candidate, in measurement order.
    pub candidates: Vec<CandidateResult>,
}

impl ScenarioReport {
    pub fn labels(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn candidate(&self, label: &str) -> Option<&CandidateResult> {
        self.candidates.iter().find(|c| c.label == label)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CandidateResult> {
        self.candidates.iter().filter(|c| c.is_failed())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateResult {
    pub label: String,
    pub outcome: CandidateOutcome,
}

impl CandidateResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, CandidateOutcome::Failed { .. })
    }

    pub fn timing(&self) -> Option<&CandidateTiming> {
        match &self.outcome {
            CandidateOutcome::Measured(timing) => Some(timing),
            CandidateOutcome::Failed { .. } => None,
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        self.timing().and_then(|t| t.ratio)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Measured(CandidateTiming),
    /// The candidate could not be measured. It stays in the report so that it is never
    /// silently omitted.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateTiming {
    /// Median over all epochs.
    pub median_ns_per_op: f64,
    /// Median absolute percentage error of the epochs around the median.
    pub error_pct: f64,
    /// `median_ns_per_op / reference.median_ns_per_op`, so values below 1.0 are faster.
    pub ratio: Option<f64>,
    pub iterations: u64,
    pub total_time_ns: u64,
    pub counters: Option<CounterSummary>,
}

impl CandidateTiming {
    pub fn ops_per_second(&self) -> f64 {
        if self.median_ns_per_op > 0.0 {
            1e9 / self.median_ns_per_op
        } else {
            f64::INFINITY
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CounterSummary {
    pub instructions_per_op: f64,
    pub cycles_per_op: f64,
}

impl CounterSummary {
    /// Instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles_per_op > 0.0 {
            self.instructions_per_op / self.cycles_per_op
        } else {
            0.0
        }
    }
}

/// The cost of `candidate_ns` relative to `reference_ns`.
///
/// Returns `None` when the reference took no measurable time.
pub fn relative_ratio(candidate_ns: f64, reference_ns: f64) -> Option<f64> {
    if reference_ns > 0.0 && reference_ns.is_finite() {
        Some(candidate_ns / reference_ns)
    } else {
        None
    }
}
