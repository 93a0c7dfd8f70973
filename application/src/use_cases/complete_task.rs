//! Complete Task use case
//!
//! An autonomous agent asks the planner how to reach its goal, then routes
//! every purchase and hire in the plan through the consensus engine.

use crate::config::PlannerConfig;
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::cast_vote::generate_with_timeout;
use crate::use_cases::run_consensus::{ConsensusEngine, RunConsensusError};
use futures::future::join_all;
use quorum_domain::{
    ActionOutcome, ActionPlan, DomainError, PlannedAction, PromptTemplate, PurchaseRequest,
    TaskOutcome, TaskRequest, parse_action_plan,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while completing a task
#[derive(Error, Debug)]
pub enum CompleteTaskError {
    #[error("Invalid task: {0}")]
    InvalidTask(#[from] DomainError),

    #[error("Consensus failed: {0}")]
    Consensus(#[from] RunConsensusError),
}

impl CompleteTaskError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, CompleteTaskError::InvalidTask(_))
    }
}

/// What a submitted action was for
enum Subject {
    Purchase { purpose: String },
    Hire { agent_type: String, task: String },
}

/// A plan action paired with the request it submits
struct Submission {
    subject: Subject,
    amount: f64,
    request: PurchaseRequest,
}

/// Use case for running an autonomous agent against the panel
pub struct ActionPlanner<G: LlmGateway + 'static> {
    engine: Arc<ConsensusEngine<G>>,
    config: PlannerConfig,
}

impl<G: LlmGateway + 'static> ActionPlanner<G> {
    pub fn new(engine: Arc<ConsensusEngine<G>>, config: PlannerConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &Arc<ConsensusEngine<G>> {
        &self.engine
    }

    /// Complete a task with default (no-op) progress
    pub async fn complete_task(&self, task: TaskRequest) -> Result<TaskOutcome, CompleteTaskError> {
        self.complete_task_with_progress(task, &NoProgress).await
    }

    /// Complete a task with progress callbacks
    pub async fn complete_task_with_progress(
        &self,
        task: TaskRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<TaskOutcome, CompleteTaskError> {
        task.validate()?;

        info!(
            "{} planning toward '{}' with a ${} budget",
            task.agent_name, task.goal, task.budget
        );

        let plan = self.plan(&task).await;
        progress.on_plan_ready(&task, &plan);

        let submissions = self.submissions(&task, &plan);
        info!(
            "{} planned {} evaluable action(s)",
            task.agent_name,
            submissions.len()
        );

        let outcomes = if self.config.concurrent_actions {
            self.evaluate_concurrently(&task, submissions, progress).await?
        } else {
            self.evaluate_sequentially(&task, submissions, progress).await?
        };

        let outcome = TaskOutcome::tally(&task, plan.reasoning, outcomes);
        info!(
            "{} finished: spent ${}, ${} remaining",
            outcome.agent, outcome.total_spent, outcome.budget_remaining
        );
        if outcome.is_over_budget() {
            warn!(
                "{} approved spending exceeds its budget by ${}",
                outcome.agent, -outcome.budget_remaining
            );
        }

        self.engine.result_log().record_task(&outcome);
        progress.on_task_complete(&outcome);
        Ok(outcome)
    }

    /// Ask the planner for a plan; a failed call yields an empty plan
    async fn plan(&self, task: &TaskRequest) -> ActionPlan {
        let prompt = PromptTemplate::planning_prompt(&task.agent_name, &task.goal, task.budget);
        let evaluator = self.engine.evaluator();
        let logger = evaluator.conversation_logger();

        let reply = generate_with_timeout(
            evaluator.gateway().as_ref(),
            &prompt,
            &self.config.model,
            evaluator.timeout(),
        )
        .await;

        match reply {
            Ok(reply) => {
                let parsed = parse_action_plan(&reply);
                logger.log(ConversationEvent::planner_reply(
                    &task.agent_name,
                    &self.config.model,
                    &reply,
                    parsed.skipped_actions,
                ));
                if !parsed.structured {
                    warn!(
                        "Could not parse a plan for {}; continuing with no actions",
                        task.agent_name
                    );
                }
                if parsed.skipped_actions > 0 {
                    warn!(
                        "Skipped {} malformed action(s) in the plan for {}",
                        parsed.skipped_actions, task.agent_name
                    );
                }
                parsed.plan
            }
            Err(e) => {
                warn!("Planner call for {} failed: {}", task.agent_name, e);
                ActionPlan::empty(format!("Error occurred: {}", e))
            }
        }
    }

    /// Turn plan actions into purchase requests, in plan order.
    ///
    /// Every request carries the task's initial budget. Actions whose
    /// request would not validate are skipped.
    fn submissions(&self, task: &TaskRequest, plan: &ActionPlan) -> Vec<Submission> {
        plan.actions
            .iter()
            .filter_map(|action| {
                let subject = match action {
                    PlannedAction::RequestPurchase { purpose, .. } => Subject::Purchase {
                        purpose: purpose.clone(),
                    },
                    PlannedAction::HireAgent {
                        agent_type,
                        task: hired_for,
                        ..
                    } => Subject::Hire {
                        agent_type: agent_type.clone(),
                        task: hired_for.clone(),
                    },
                    PlannedAction::Complete => return None,
                };
                let request = action.to_purchase_request(&task.agent_name, task.budget)?;
                if let Err(e) = request.validate() {
                    warn!("Skipping planned action for {}: {}", task.agent_name, e);
                    return None;
                }
                Some(Submission {
                    subject,
                    amount: action.amount(),
                    request,
                })
            })
            .collect()
    }

    async fn evaluate_sequentially(
        &self,
        task: &TaskRequest,
        submissions: Vec<Submission>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ActionOutcome>, CompleteTaskError> {
        let mut outcomes = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let outcome = self.evaluate_one(task, submission, progress).await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn evaluate_concurrently(
        &self,
        task: &TaskRequest,
        submissions: Vec<Submission>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ActionOutcome>, CompleteTaskError> {
        debug!("Evaluating {} action(s) concurrently", submissions.len());
        // join_all yields results in input order
        join_all(
            submissions
                .into_iter()
                .map(|submission| self.evaluate_one(task, submission, progress)),
        )
        .await
        .into_iter()
        .collect()
    }

    async fn evaluate_one(
        &self,
        task: &TaskRequest,
        submission: Submission,
        progress: &dyn ProgressNotifier,
    ) -> Result<ActionOutcome, CompleteTaskError> {
        let Submission {
            subject,
            amount,
            request,
        } = submission;
        let decision = self.engine.evaluate_with_progress(request, progress).await?;

        let outcome = match subject {
            Subject::Purchase { purpose } => ActionOutcome::purchase(purpose, amount, decision),
            Subject::Hire {
                agent_type,
                task: hired_for,
            } => ActionOutcome::agent_hire(agent_type, hired_for, amount, decision),
        };

        progress.on_action_complete(task, &outcome);
        Ok(outcome)
    }
}
