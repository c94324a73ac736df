use container_bench_core::prelude::ConfigurationError;
use std::time::Duration;

/// Trades wall-clock time for low-noise results. The target epoch time ends up clamped to
/// [BenchConfig::max_epoch_time].
pub const ACCURATE_CLOCK_RESOLUTION_MULTIPLE: u64 = 10_000_000;
/// Quick, noisy results. Useful while developing workloads.
pub const FAST_CLOCK_RESOLUTION_MULTIPLE: u64 = 10;

/// Calibration settings for a measurement session, fixed when the session is created.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    clock_resolution_multiple: u64,
    relative: bool,
    performance_counters: bool,
    epochs: usize,
    min_epoch_iterations: u64,
    min_epoch_time: Duration,
    max_epoch_time: Duration,
    warmup: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            clock_resolution_multiple: 1_000,
            relative: false,
            performance_counters: false,
            epochs: 11,
            min_epoch_iterations: 1,
            min_epoch_time: Duration::ZERO,
            max_epoch_time: Duration::from_millis(100),
            warmup: 0,
        }
    }
}

impl BenchConfig {
    /// The configuration used for every scenario of a full comparison run.
    pub fn accurate() -> Self {
        Self::default()
            .clock_resolution_multiple(ACCURATE_CLOCK_RESOLUTION_MULTIPLE)
            .relative(true)
            .performance_counters(true)
    }

    /// Each epoch should take at least `multiple` times the clock resolution.
    pub fn clock_resolution_multiple(mut self, multiple: u64) -> Self {
        self.clock_resolution_multiple = multiple;
        self
    }

    /// Express every result as a ratio against the first measured candidate.
    pub fn relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// Sample hardware counters alongside wall time.
    pub fn performance_counters(mut self, enabled: bool) -> Self {
        self.performance_counters = enabled;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn min_epoch_iterations(mut self, iterations: u64) -> Self {
        self.min_epoch_iterations = iterations;
        self
    }

    pub fn min_epoch_time(mut self, time: Duration) -> Self {
        self.min_epoch_time = time;
        self
    }

    pub fn max_epoch_time(mut self, time: Duration) -> Self {
        self.max_epoch_time = time;
        self
    }

    /// Untimed iterations to run before calibration starts.
    pub fn warmup(mut self, iterations: u64) -> Self {
        self.warmup = iterations;
        self
    }

    pub fn get_clock_resolution_multiple(&self) -> u64 {
        self.clock_resolution_multiple
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn has_performance_counters(&self) -> bool {
        self.performance_counters
    }

    pub fn get_epochs(&self) -> usize {
        self.epochs
    }

    pub fn get_min_epoch_iterations(&self) -> u64 {
        self.min_epoch_iterations
    }

    pub fn get_warmup(&self) -> u64 {
        self.warmup
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.clock_resolution_multiple == 0 {
            return Err(ConfigurationError::ClockResolutionMultiple(
                self.clock_resolution_multiple,
            ));
        }
        if self.epochs == 0 {
            return Err(ConfigurationError::NoEpochs);
        }
        if self.min_epoch_iterations == 0 {
            return Err(ConfigurationError::NoEpochIterations);
        }
        if self.min_epoch_time > self.max_epoch_time {
            return Err(ConfigurationError::EpochTimeBounds {
                min: self.min_epoch_time,
                max: self.max_epoch_time,
            });
        }
        Ok(())
    }

    /// How long one epoch should run for, given the resolution of the clock.
    pub fn target_epoch_time(&self, clock_resolution: Duration) -> Duration {
        let multiple = u32::try_from(self.clock_resolution_multiple).unwrap_or(u32::MAX);
        clock_resolution
            .saturating_mul(multiple)
            .clamp(self.min_epoch_time, self.max_epoch_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accurate_config_is_relative_with_counters() {
        let config = BenchConfig::accurate();

        assert_eq!(10_000_000, config.get_clock_resolution_multiple());
        assert!(config.is_relative());
        assert!(config.has_performance_counters());
        config.validate().unwrap();
    }

    #[test]
    fn reject_zero_clock_resolution_multiple() {
        let result = BenchConfig::default().clock_resolution_multiple(0).validate();

        assert!(matches!(
            result,
            Err(ConfigurationError::ClockResolutionMultiple(0))
        ));
    }

    #[test]
    fn reject_zero_epochs() {
        assert!(matches!(
            BenchConfig::default().epochs(0).validate(),
            Err(ConfigurationError::NoEpochs)
        ));
    }

    #[test]
    fn reject_inverted_epoch_bounds() {
        let result = BenchConfig::default()
            .min_epoch_time(Duration::from_secs(1))
            .max_epoch_time(Duration::from_millis(1))
            .validate();

        assert!(matches!(
            result,
            Err(ConfigurationError::EpochTimeBounds { .. })
        ));
    }

    #[test]
    fn large_multiple_is_clamped_to_max_epoch_time() {
        let config = BenchConfig::accurate();

        assert_eq!(
            Duration::from_millis(100),
            config.target_epoch_time(Duration::from_nanos(20))
        );
    }

    #[test]
    fn small_multiple_scales_resolution() {
        let config = BenchConfig::default().clock_resolution_multiple(10);

        assert_eq!(
            Duration::from_nanos(200),
            config.target_epoch_time(Duration::from_nanos(20))
        );
    }
}
