//! Counters for one dispatch loop run.

use std::fmt;

/// What happened during one `JobRunner::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Inputs handed to the handler.
    pub dispatched: u64,
    /// Inputs reported via `complete_input`.
    pub completed: u64,
    /// Inputs reported via `handle_exception_for_input`.
    pub faulted: u64,
    /// Inputs reported via `handle_canceled_input`.
    pub canceled: u64,
    /// Largest number of inputs in flight at once.
    pub peak_active: usize,
}

impl RunSummary {
    /// Inputs whose outcome has been reported to the source.
    pub fn reported(&self) -> u64 {
        self.completed + self.faulted + self.canceled
    }

    pub(crate) fn record_dispatch(&mut self, active: usize) {
        self.dispatched += 1;
        self.peak_active = self.peak_active.max(active);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dispatched, {} completed, {} faulted, {} canceled (peak {} in flight)",
            self.dispatched, self.completed, self.faulted, self.canceled, self.peak_active
        )
    }
}
