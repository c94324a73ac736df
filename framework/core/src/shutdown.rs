use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct ShutdownState {
    signalled: Mutex<bool>,
    condvar: Condvar,
}

/// Signals helper threads, such as the resource monitor, that the run is over.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    state: Arc<ShutdownState>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown(&self) {
        let mut signalled = self.state.signalled.lock();
        if !*signalled {
            log::trace!("Sending shutdown signal");
            *signalled = true;
        }
        self.state.condvar.notify_all();
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener {
            state: self.state.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DelegatedShutdownListener {
    state: Arc<ShutdownState>,
}

impl DelegatedShutdownListener {
    /// Point in time check if the shutdown signal has been received.
    pub fn should_shutdown(&self) -> bool {
        *self.state.signalled.lock()
    }

    /// Sleep for up to `timeout`, waking early if the shutdown signal arrives.
    ///
    /// Returns true if the shutdown signal has been received.
    pub fn wait_for_shutdown(&self, timeout: Duration) -> bool {
        let mut signalled = self.state.signalled.lock();
        if !*signalled {
            self.state.condvar.wait_for(&mut signalled, timeout);
        }
        *signalled
    }
}
