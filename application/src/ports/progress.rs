//! Progress notification port
//!
//! Defines the interface for reporting progress while the panel deliberates
//! and while autonomous agents work through their plans.

use quorum_domain::{
    ActionOutcome, ActionPlan, Decision, ParseTier, PurchaseRequest, TaskOutcome, TaskRequest,
    Verdict,
};

/// Callback for progress updates
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a request is put in front of the panel
    fn on_evaluation_start(&self, request: &PurchaseRequest, panel_size: usize);

    /// Called as each evaluator's verdict arrives (arrival order, not panel order).
    /// `tier` is `None` when the evaluator could not be reached.
    fn on_verdict(&self, verdict: &Verdict, tier: Option<ParseTier>);

    /// Called once the decision has been aggregated
    fn on_decision(&self, decision: &Decision);

    // ==================== Planning Callbacks ====================

    /// Called when the planner has produced a plan for a task
    fn on_plan_ready(&self, _task: &TaskRequest, _plan: &ActionPlan) {}

    /// Called after each planned action has been evaluated
    fn on_action_complete(&self, _task: &TaskRequest, _outcome: &ActionOutcome) {}

    /// Called when every action of a task has been evaluated
    fn on_task_complete(&self, _outcome: &TaskOutcome) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_evaluation_start(&self, _request: &PurchaseRequest, _panel_size: usize) {}
    fn on_verdict(&self, _verdict: &Verdict, _tier: Option<ParseTier>) {}
    fn on_decision(&self, _decision: &Decision) {}
}
