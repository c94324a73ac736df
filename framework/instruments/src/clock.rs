use std::sync::OnceLock;
use std::time::{Duration, Instant};

const RESOLUTION_SAMPLES: usize = 20;

/// The smallest observable non-zero step of [Instant], measured once per process.
pub fn clock_resolution() -> Duration {
    static RESOLUTION: OnceLock<Duration> = OnceLock::new();
    *RESOLUTION.get_or_init(|| {
        let resolution = measure_clock_resolution(RESOLUTION_SAMPLES);
        log::debug!("Estimated clock resolution: {resolution:?}");
        resolution
    })
}

fn measure_clock_resolution(samples: usize) -> Duration {
    (0..samples)
        .map(|_| {
            let start = Instant::now();
            loop {
                let now = Instant::now();
                if now > start {
                    break now - start;
                }
            }
        })
        .min()
        .unwrap_or(Duration::from_nanos(1))
        .max(Duration::from_nanos(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_positive_and_small() {
        let resolution = clock_resolution();

        assert!(resolution > Duration::ZERO);
        assert!(resolution < Duration::from_millis(10));
        assert_eq!(resolution, clock_resolution());
    }
}
