use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Snapshot of the spider run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpiderStatus {
    /// Number of page-walks currently running
    pub running: usize,

    /// Whether a stop has been requested and not yet cleared
    pub stop_requested: bool,
}

#[derive(Debug, Default)]
struct RunCounters {
    running: usize,
    stop_requested: bool,
}

/// Shared state for all page-walks
///
/// One stop flag is shared by every running walk, so a stop request ends all
/// of them. The flag is cleared when the last walk exits, so a later walk does
/// not start out already stopped.
#[derive(Debug, Default)]
pub struct SpiderRunState {
    counters: Mutex<RunCounters>,
}

impl SpiderRunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a running walk
    ///
    /// The walk stays registered until the returned guard is dropped.
    pub fn enter(self: &Arc<Self>) -> WalkGuard {
        self.lock().running += 1;
        WalkGuard {
            state: Arc::clone(self),
        }
    }

    /// Asks every running walk to stop before its next page
    ///
    /// Returns false, leaving the flag clear, when no walk is running.
    pub fn request_stop(&self) -> bool {
        let mut counters = self.lock();
        if counters.running == 0 {
            return false;
        }
        counters.stop_requested = true;
        true
    }

    pub fn stop_requested(&self) -> bool {
        self.lock().stop_requested
    }

    pub fn running(&self) -> usize {
        self.lock().running
    }

    pub fn status(&self) -> SpiderStatus {
        let counters = self.lock();
        SpiderStatus {
            running: counters.running,
            stop_requested: counters.stop_requested,
        }
    }

    fn leave(&self) {
        let mut counters = self.lock();
        counters.running = counters.running.saturating_sub(1);
        if counters.running == 0 {
            counters.stop_requested = false;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunCounters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registration of one running walk; dropping it marks the walk finished
#[derive(Debug)]
pub struct WalkGuard {
    state: Arc<SpiderRunState>,
}

impl Drop for WalkGuard {
    fn drop(&mut self) {
        self.state.leave();
    }
}
