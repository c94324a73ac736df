use crate::clock::clock_resolution;
use crate::config::BenchConfig;
use crate::counters::{default_counters, CounterFactory, CounterSample, PerformanceCounters};
use crate::stats::{median, median_absolute_percentage_error};
use container_bench_core::prelude::{
    ConfigurationError, DataTypeFamily, MeasurementError, ScenarioId,
};
use container_bench_summary_model::{
    relative_ratio, CandidateOutcome, CandidateResult, CandidateTiming, CounterSummary,
    ScenarioReport,
};
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

/// Upper bound on the iterations of one epoch, so that calibration terminates for workloads
/// the optimiser has reduced to nothing.
const MAX_EPOCH_ITERATIONS: u64 = 1 << 40;

/// Timings for one measured workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Nanoseconds per iteration, one value per epoch.
    pub epoch_ns_per_op: Vec<f64>,
    pub iterations_per_epoch: u64,
    pub total_time: Duration,
    pub counters: Option<CounterSummary>,
}

impl Measurement {
    pub fn median_ns_per_op(&self) -> f64 {
        median(&self.epoch_ns_per_op).unwrap_or(0.0)
    }

    pub fn error_pct(&self) -> f64 {
        median_absolute_percentage_error(&self.epoch_ns_per_op).unwrap_or(0.0)
    }

    pub fn total_iterations(&self) -> u64 {
        self.iterations_per_epoch * self.epoch_ns_per_op.len() as u64
    }
}

#[derive(Debug)]
enum Recorded {
    Measured(Measurement),
    Failed(String),
}

/// One calibrated comparison: the measurement session for a single scenario.
///
/// The session is created with a fixed [BenchConfig], named with [Bench::set_title] from the
/// baseline run, then accumulates one record per candidate. [Bench::finalize] consumes it and
/// produces the [ScenarioReport].
pub struct Bench {
    family: DataTypeFamily,
    scenario: ScenarioId,
    config: BenchConfig,
    title: Option<String>,
    counter_factory: CounterFactory,
    counters: Option<Box<dyn PerformanceCounters>>,
    baseline: Option<Measurement>,
    records: Vec<(String, Recorded)>,
}

impl std::fmt::Debug for Bench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bench")
            .field("family", &self.family)
            .field("scenario", &self.scenario)
            .field("config", &self.config)
            .field("title", &self.title)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl Bench {
    pub fn new(
        family: DataTypeFamily,
        scenario: ScenarioId,
        config: BenchConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            family,
            scenario,
            config,
            title: None,
            counter_factory: default_counters,
            counters: None,
            baseline: None,
            records: Vec::new(),
        })
    }

    /// Use a different source of performance counters.
    pub fn with_counters(mut self, factory: CounterFactory) -> Self {
        self.counter_factory = factory;
        self
    }

    pub fn family(&self) -> DataTypeFamily {
        self.family
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn performance_counters_enabled(&self) -> bool {
        self.config.has_performance_counters()
    }

    /// Continue this session with wall time only.
    pub fn disable_performance_counters(&mut self) {
        self.config = self.config.clone().performance_counters(false);
        self.counters = None;
    }

    /// Measure the baseline workload. It is kept apart from the candidates and never becomes a
    /// report row.
    pub fn measure_baseline<F: FnMut()>(&mut self, workload: F) -> Result<(), MeasurementError> {
        let measurement = self.run_measurement(workload)?;
        log::trace!(
            "{} scenario {} baseline: {:.3} ns/op",
            self.family,
            self.scenario,
            measurement.median_ns_per_op()
        );
        self.baseline = Some(measurement);
        Ok(())
    }

    /// Measure one candidate's workload and record it under `label`.
    ///
    /// On error nothing is recorded, the caller decides whether to retry or mark the candidate
    /// as failed.
    pub fn measure<F: FnMut()>(
        &mut self,
        label: &str,
        workload: F,
    ) -> Result<(), MeasurementError> {
        let measurement = self.run_measurement(workload)?;
        log::debug!(
            "{} scenario {} `{}`: {:.3} ns/op ±{:.1}%",
            self.family,
            self.scenario,
            label,
            measurement.median_ns_per_op(),
            measurement.error_pct()
        );
        self.record(label, Recorded::Measured(measurement));
        Ok(())
    }

    /// Record an explicit failure marker for `label`, replacing anything recorded for it.
    pub fn record_failure(&mut self, label: &str, reason: impl Into<String>) {
        self.record(label, Recorded::Failed(reason.into()));
    }

    /// Whether anything, measurement or failure, has been recorded for `label`.
    pub fn has_record(&self, label: &str) -> bool {
        self.records.iter().any(|(l, _)| l == label)
    }

    pub fn measurement(&self, label: &str) -> Option<&Measurement> {
        self.records.iter().find_map(|(l, r)| match r {
            Recorded::Measured(m) if l == label => Some(m),
            _ => None,
        })
    }

    pub fn baseline(&self) -> Option<&Measurement> {
        self.baseline.as_ref()
    }

    fn record(&mut self, label: &str, recorded: Recorded) {
        match self.records.iter_mut().find(|(l, _)| l == label) {
            Some(existing) => existing.1 = recorded,
            None => self.records.push((label.to_string(), recorded)),
        }
    }

    /// Compute ratios against the first measured candidate and produce the report.
    pub fn finalize(self) -> ScenarioReport {
        let reference = if self.config.is_relative() {
            self.records.iter().find_map(|(label, r)| match r {
                Recorded::Measured(m) => Some((label.clone(), m.median_ns_per_op())),
                Recorded::Failed(_) => None,
            })
        } else {
            None
        };

        let candidates = self
            .records
            .into_iter()
            .map(|(label, recorded)| {
                let outcome = match recorded {
                    Recorded::Measured(m) => {
                        let median_ns_per_op = m.median_ns_per_op();
                        CandidateOutcome::Measured(CandidateTiming {
                            median_ns_per_op,
                            error_pct: m.error_pct(),
                            ratio: reference.as_ref().and_then(|(reference_label, reference_ns)| {
                                if *reference_label == label {
                                    Some(1.0)
                                } else {
                                    relative_ratio(median_ns_per_op, *reference_ns)
                                }
                            }),
                            iterations: m.total_iterations(),
                            total_time_ns: u64::try_from(m.total_time.as_nanos())
                                .unwrap_or(u64::MAX),
                            counters: m.counters,
                        })
                    }
                    Recorded::Failed(reason) => CandidateOutcome::Failed { reason },
                };
                CandidateResult { label, outcome }
            })
            .collect();

        ScenarioReport {
            family: self.family,
            scenario: self.scenario.get(),
            title: self
                .title
                .unwrap_or_else(|| format!("{} scenario {}", self.family, self.scenario)),
            baseline_ns_per_op: self.baseline.as_ref().map(Measurement::median_ns_per_op),
            reference: reference.map(|(label, _)| label),
            counters_enabled: self.config.has_performance_counters(),
            candidates,
        }
    }

    fn run_measurement<F: FnMut()>(
        &mut self,
        mut workload: F,
    ) -> Result<Measurement, MeasurementError> {
        if self.config.has_performance_counters() && self.counters.is_none() {
            self.counters = Some((self.counter_factory)()?);
        }

        let config = self.config.clone();
        let target = config.target_epoch_time(clock_resolution());
        let counters = &mut self.counters;

        std::panic::catch_unwind(AssertUnwindSafe(|| -> Result<Measurement, MeasurementError> {
            for _ in 0..config.get_warmup() {
                workload();
            }

            let iterations = calibrate(&mut workload, config.get_min_epoch_iterations(), target);

            let mut epoch_ns_per_op = Vec::with_capacity(config.get_epochs());
            let mut samples = Vec::with_capacity(config.get_epochs());
            let mut total_time = Duration::ZERO;
            for _ in 0..config.get_epochs() {
                if let Some(counters) = counters.as_mut() {
                    counters.start()?;
                }
                let elapsed = time_epoch(&mut workload, iterations);
                if let Some(counters) = counters.as_mut() {
                    samples.push(counters.stop()?);
                }

                total_time += elapsed;
                epoch_ns_per_op.push(elapsed.as_nanos() as f64 / iterations as f64);
            }

            Ok(Measurement {
                epoch_ns_per_op,
                iterations_per_epoch: iterations,
                total_time,
                counters: summarize_counters(&samples, iterations),
            })
        }))
        .map_err(|panic| MeasurementError::WorkloadPanicked(panic_message(panic.as_ref())))?
    }
}

/// Grow the iteration count until one epoch takes at least `target`.
fn calibrate<F: FnMut()>(workload: &mut F, min_iterations: u64, target: Duration) -> u64 {
    let mut iterations = min_iterations;
    loop {
        let elapsed = time_epoch(workload, iterations);
        if elapsed >= target || iterations >= MAX_EPOCH_ITERATIONS {
            return iterations;
        }

        let next = if elapsed.is_zero() {
            iterations.saturating_mul(10)
        } else {
            // Aim slightly past the target so that the next epoch usually reaches it.
            let scale = target.as_secs_f64() / elapsed.as_secs_f64() * 1.2;
            ((iterations as f64) * scale).ceil() as u64
        };
        iterations = next.clamp(iterations + 1, MAX_EPOCH_ITERATIONS);
    }
}

fn time_epoch<F: FnMut()>(workload: &mut F, iterations: u64) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        workload();
    }
    start.elapsed()
}

fn summarize_counters(samples: &[CounterSample], iterations: u64) -> Option<CounterSummary> {
    if samples.is_empty() {
        return None;
    }

    let per_op = |f: fn(&CounterSample) -> u64| {
        let values = samples
            .iter()
            .map(|s| f(s) as f64 / iterations as f64)
            .collect::<Vec<_>>();
        median(&values).unwrap_or(0.0)
    };

    Some(CounterSummary {
        instructions_per_op: per_op(|s| s.instructions),
        cycles_per_op: per_op(|s| s.cycles),
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
