//! Progress handler trait and events

use std::time::Duration;

/// Events emitted during a preparation run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { root: String },

    /// A phase is about to run
    PhaseStarted { phase: String },

    /// A phase finished successfully
    PhaseComplete { phase: String, duration: Duration },

    /// Candidate collection finished
    CandidatesCollected { candidates: usize },

    /// Compile order resolved
    OrderResolved { units: usize, passes: usize },

    /// Run finished successfully
    Completed { total_time: Duration },

    /// Run aborted
    Failed { phase: String, error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
