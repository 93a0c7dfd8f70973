//! Autonomous-agent planning domain
//!
//! An agent with a goal and a budget asks a planner for a list of
//! [`PlannedAction`]s. Each purchase or hire is then routed through the
//! quorum gate and recorded as an [`ActionOutcome`]; the run as a whole is a
//! [`TaskOutcome`].

mod action;
mod outcome;
mod parser;

pub use action::{ActionPlan, PlannedAction};
pub use outcome::{ActionKind, ActionOutcome, DEFAULT_TASK_BUDGET, TaskOutcome, TaskRequest};
pub use parser::{PlanParse, parse_action_plan};
