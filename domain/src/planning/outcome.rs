//! Results of running an agent's plan through the panel

use crate::core::error::DomainError;
use crate::quorum::Decision;
use serde::{Deserialize, Serialize};

/// Budget used when a task arrives without one
pub const DEFAULT_TASK_BUDGET: f64 = 5_000.0;

fn default_task_budget() -> f64 {
    DEFAULT_TASK_BUDGET
}

/// A goal an autonomous agent should work toward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub agent_name: String,
    pub goal: String,
    #[serde(default = "default_task_budget")]
    pub budget: f64,
}

impl TaskRequest {
    pub fn new(agent_name: impl Into<String>, goal: impl Into<String>, budget: f64) -> Self {
        Self {
            agent_name: agent_name.into(),
            goal: goal.into(),
            budget,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.agent_name.trim().is_empty() {
            return Err(DomainError::InvalidTask(
                "agent_name must not be empty".to_string(),
            ));
        }
        if self.goal.trim().is_empty() {
            return Err(DomainError::InvalidTask("goal must not be empty".to_string()));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(DomainError::InvalidTask(format!(
                "budget must be a non-negative number, got {}",
                self.budget
            )));
        }
        Ok(())
    }
}

/// Which kind of planned action produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Purchase,
    AgentHire,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Purchase => "purchase",
            ActionKind::AgentHire => "agent_hire",
        }
    }
}

/// One evaluated action
///
/// `amount` is what the action actually spent: the requested amount when
/// approved, zero otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub approved: bool,
    pub amount: f64,
    pub requested_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_hired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(rename = "votes")]
    pub decision: Decision,
}

impl ActionOutcome {
    pub fn purchase(purpose: impl Into<String>, requested: f64, decision: Decision) -> Self {
        Self {
            kind: ActionKind::Purchase,
            approved: decision.approved,
            amount: charged(requested, &decision),
            requested_amount: requested,
            purpose: Some(purpose.into()),
            agent_hired: None,
            task: None,
            decision,
        }
    }

    pub fn agent_hire(
        agent_type: impl Into<String>,
        task: impl Into<String>,
        requested: f64,
        decision: Decision,
    ) -> Self {
        Self {
            kind: ActionKind::AgentHire,
            approved: decision.approved,
            amount: charged(requested, &decision),
            requested_amount: requested,
            purpose: None,
            agent_hired: Some(agent_type.into()),
            task: Some(task.into()),
            decision,
        }
    }

    /// Short human-readable description of the action
    pub fn title(&self) -> String {
        match self.kind {
            ActionKind::Purchase => self.purpose.clone().unwrap_or_default(),
            ActionKind::AgentHire => format!(
                "Hire {} for {}",
                self.agent_hired.as_deref().unwrap_or_default(),
                self.task.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn charged(requested: f64, decision: &Decision) -> f64 {
    if decision.approved { requested } else { 0.0 }
}

/// Summary of everything an agent did for one goal
///
/// `budget_remaining` is simply `budget - total_spent` and may go negative
/// when approved actions exceed the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub agent: String,
    pub goal: String,
    pub reasoning: String,
    pub actions_taken: Vec<ActionOutcome>,
    pub total_spent: f64,
    pub budget_remaining: f64,
}

impl TaskOutcome {
    /// Total up the outcomes against the task's budget
    pub fn tally(task: &TaskRequest, reasoning: impl Into<String>, actions: Vec<ActionOutcome>) -> Self {
        let total_spent: f64 = actions.iter().map(|a| a.amount).sum();
        Self {
            agent: task.agent_name.clone(),
            goal: task.goal.clone(),
            reasoning: reasoning.into(),
            total_spent,
            budget_remaining: task.budget - total_spent,
            actions_taken: actions,
        }
    }

    pub fn approved_count(&self) -> usize {
        self.actions_taken.iter().filter(|a| a.approved).count()
    }

    pub fn denied_count(&self) -> usize {
        self.actions_taken.len() - self.approved_count()
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget_remaining < 0.0
    }
}
