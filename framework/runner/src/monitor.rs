use container_bench_core::prelude::DelegatedShutdownListener;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Other processes using more than this share of the machine's CPU, in percent, are reported.
const FOREIGN_CPU_WARN_THRESHOLD: f32 = 20.0;
const WARN_INTERVAL: Duration = Duration::from_secs(30);

/// Monitor the CPU usage of other processes while the benchmark runs.
///
/// Note that this won't stop the benchmark, it will just log a warning to let the user know that
/// their results might be disturbed by a busy machine.
///
/// Usage is sampled every [sysinfo::MINIMUM_CPU_UPDATE_INTERVAL]. The load of this process is
/// subtracted from the global load, and if the remainder is above
/// [FOREIGN_CPU_WARN_THRESHOLD] a warning is logged, at most once per [WARN_INTERVAL].
pub(crate) fn start_monitor(
    shutdown_listener: DelegatedShutdownListener,
) -> Option<JoinHandle<()>> {
    let spawned = std::thread::Builder::new()
        .name("monitor".to_string())
        .spawn(move || {
            let this_process_pid = Pid::from_u32(std::process::id());
            let mut sys = System::new();

            sys.refresh_cpu_usage();
            let cpu_count = sys.cpus().len().max(1);
            let mut last_warning: Option<Instant> = None;

            loop {
                if shutdown_listener.wait_for_shutdown(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL) {
                    log::trace!("Monitor thread shutting down");
                    break;
                }

                sys.refresh_cpu_usage();
                sys.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[this_process_pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu(),
                );

                let own_usage = sys
                    .process(this_process_pid)
                    .map(|p| p.cpu_usage() / cpu_count as f32)
                    .unwrap_or(0.0);
                let foreign_usage = foreign_cpu_usage(sys.global_cpu_usage(), own_usage);

                if foreign_usage > FOREIGN_CPU_WARN_THRESHOLD
                    && last_warning.map_or(true, |t| t.elapsed() >= WARN_INTERVAL)
                {
                    log::warn!(
                        "Other processes are using {:.2}% of the CPU across {} cores, benchmark timings may be disturbed",
                        foreign_usage,
                        cpu_count
                    );
                    last_warning = Some(Instant::now());
                }
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Failed to start monitor thread: {e}");
            None
        }
    }
}

fn foreign_cpu_usage(global_usage: f32, own_usage: f32) -> f32 {
    (global_usage - own_usage).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use container_bench_core::prelude::ShutdownHandle;

    #[test]
    fn own_usage_is_subtracted() {
        assert_eq!(15.0, foreign_cpu_usage(40.0, 25.0));
        assert_eq!(0.0, foreign_cpu_usage(10.0, 25.0));
    }

    #[test]
    fn monitor_stops_on_shutdown() {
        let shutdown_handle = ShutdownHandle::new();
        let handle = start_monitor(shutdown_handle.new_listener()).unwrap();

        shutdown_handle.shutdown();
        handle.join().unwrap();
    }
}
