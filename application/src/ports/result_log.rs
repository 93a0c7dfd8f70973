//! Result log port
//!
//! Append-only record of every decision and every completed task for the
//! lifetime of the process. Shared between concurrent evaluations, so
//! implementations must tolerate concurrent appends.

use quorum_domain::{Decision, TaskOutcome};
use std::sync::Mutex;

/// Port for recording decisions and task outcomes
pub trait ResultLog: Send + Sync {
    /// Append a decision
    fn record_decision(&self, decision: &Decision);

    /// Append a task outcome
    fn record_task(&self, outcome: &TaskOutcome);

    /// All decisions, in the order they were recorded
    fn decisions(&self) -> Vec<Decision>;

    /// All task outcomes, in the order they were recorded
    fn tasks(&self) -> Vec<TaskOutcome>;
}

/// In-memory result log guarded by a mutex
#[derive(Default)]
pub struct InMemoryResultLog {
    decisions: Mutex<Vec<Decision>>,
    tasks: Mutex<Vec<TaskOutcome>>,
}

impl InMemoryResultLog {
    pub fn new() -> Self {
        Self::default()
    }
}

// A poisoned lock only means another appender panicked mid-push; the vector
// itself is still usable.
impl ResultLog for InMemoryResultLog {
    fn record_decision(&self, decision: &Decision) {
        let mut decisions = self.decisions.lock().unwrap_or_else(|e| e.into_inner());
        decisions.push(decision.clone());
    }

    fn record_task(&self, outcome: &TaskOutcome) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.push(outcome.clone());
    }

    fn decisions(&self) -> Vec<Decision> {
        self.decisions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn tasks(&self) -> Vec<TaskOutcome> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
