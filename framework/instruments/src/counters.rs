use container_bench_core::prelude::MeasurementError;

/// Hardware event counts accumulated over one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSample {
    pub instructions: u64,
    pub cycles: u64,
}

/// A source of hardware performance counters.
///
/// A session calls [PerformanceCounters::start] right before an epoch and
/// [PerformanceCounters::stop] right after it, on the measuring thread.
pub trait PerformanceCounters: Send {
    fn start(&mut self) -> Result<(), MeasurementError>;

    fn stop(&mut self) -> Result<CounterSample, MeasurementError>;
}

/// Opens the counters for a session. Called lazily, on the first measurement that needs them.
pub type CounterFactory = fn() -> Result<Box<dyn PerformanceCounters>, MeasurementError>;

/// The counter backend for this platform.
///
/// On Linux this is [perf_event_counters]. Elsewhere it is [unavailable_counters], and sessions
/// that ask for counters fall back to wall time only.
pub fn default_counters() -> Result<Box<dyn PerformanceCounters>, MeasurementError> {
    #[cfg(target_os = "linux")]
    {
        perf_event_counters()
    }
    #[cfg(not(target_os = "linux"))]
    {
        unavailable_counters()
    }
}

/// A backend that never opens, for platforms without hardware counters.
pub fn unavailable_counters() -> Result<Box<dyn PerformanceCounters>, MeasurementError> {
    Err(MeasurementError::CountersUnavailable(
        "no hardware counter backend is available on this platform".to_string(),
    ))
}

/// Instructions and cycles of the calling thread, read through `perf_event_open`.
///
/// Opening fails when the kernel refuses access, for example under a restrictive
/// `perf_event_paranoid` or in a VM without a virtual PMU. That failure is reported as
/// [MeasurementError::CountersUnavailable].
#[cfg(target_os = "linux")]
pub fn perf_event_counters() -> Result<Box<dyn PerformanceCounters>, MeasurementError> {
    Ok(Box::new(perf::PerfEventCounters::open()?))
}

#[cfg(target_os = "linux")]
mod perf {
    use super::{CounterSample, PerformanceCounters};
    use container_bench_core::prelude::MeasurementError;
    use perf_event::events::Hardware;
    use perf_event::{Builder, Counter, Group};

    pub(super) struct PerfEventCounters {
        group: Group,
        instructions: Counter,
        cycles: Counter,
    }

    impl PerfEventCounters {
        pub(super) fn open() -> Result<Self, MeasurementError> {
            let unavailable =
                |e: std::io::Error| MeasurementError::CountersUnavailable(e.to_string());

            let mut group = Group::new().map_err(unavailable)?;
            let instructions = group
                .add(&Builder::new(Hardware::INSTRUCTIONS))
                .map_err(unavailable)?;
            let cycles = group
                .add(&Builder::new(Hardware::CPU_CYCLES))
                .map_err(unavailable)?;

            log::debug!("Opened perf event counters for instructions and cycles");

            Ok(Self {
                group,
                instructions,
                cycles,
            })
        }
    }

    impl PerformanceCounters for PerfEventCounters {
        fn start(&mut self) -> Result<(), MeasurementError> {
            self.group.reset().map_err(sampling)?;
            self.group.enable().map_err(sampling)
        }

        fn stop(&mut self) -> Result<CounterSample, MeasurementError> {
            self.group.disable().map_err(sampling)?;
            let counts = self.group.read().map_err(sampling)?;

            Ok(CounterSample {
                instructions: counts[&self.instructions],
                cycles: counts[&self.cycles],
            })
        }
    }

    fn sampling(e: std::io::Error) -> MeasurementError {
        MeasurementError::CounterSampling(e.to_string())
    }
}
