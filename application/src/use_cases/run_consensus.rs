//! Run Consensus use case
//!
//! Puts a purchase request in front of the whole panel and aggregates the
//! verdicts into a [`Decision`].

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_log::ResultLog;
use crate::use_cases::cast_vote::{CastVoteOutput, Evaluator};
use quorum_domain::{Decision, DomainError, Panel, PurchaseRequest, Verdict};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can occur during an evaluation
#[derive(Error, Debug)]
pub enum RunConsensusError {
    #[error("Invalid purchase request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Evaluator task failed: {0}")]
    EvaluatorTask(String),
}

impl RunConsensusError {
    /// Whether the caller supplied bad input (as opposed to an internal failure)
    pub fn is_input_error(&self) -> bool {
        matches!(self, RunConsensusError::InvalidRequest(_))
    }
}

/// Use case for running the panel vote
///
/// Every evaluation asks all five evaluators concurrently, waits for all of
/// them and appends the resulting decision to the result log.
pub struct ConsensusEngine<G: LlmGateway + 'static> {
    evaluator: Evaluator<G>,
    panel: Arc<Panel>,
    results: Arc<dyn ResultLog>,
}

impl<G: LlmGateway + 'static> ConsensusEngine<G> {
    pub fn new(evaluator: Evaluator<G>, panel: Panel, results: Arc<dyn ResultLog>) -> Self {
        Self {
            evaluator,
            panel: Arc::new(panel),
            results,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn evaluator(&self) -> &Evaluator<G> {
        &self.evaluator
    }

    pub fn result_log(&self) -> &Arc<dyn ResultLog> {
        &self.results
    }

    /// Evaluate with default (no-op) progress
    pub async fn evaluate(&self, request: PurchaseRequest) -> Result<Decision, RunConsensusError> {
        self.evaluate_with_progress(request, &NoProgress).await
    }

    /// Evaluate with progress callbacks
    pub async fn evaluate_with_progress(
        &self,
        request: PurchaseRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<Decision, RunConsensusError> {
        request.validate()?;

        info!(
            "Evaluating ${} for '{}' from {} with {} evaluators",
            request.amount,
            request.purpose,
            request.requesting_agent,
            self.panel.len()
        );
        progress.on_evaluation_start(&request, self.panel.len());

        let request = Arc::new(request);
        let mut join_set = JoinSet::new();

        for (index, profile) in self.panel.profiles().iter().enumerate() {
            let evaluator = self.evaluator.clone();
            let profile = profile.clone();
            let request = Arc::clone(&request);

            join_set.spawn(async move {
                let output = evaluator.vote_with_tier(&profile, &request).await;
                (index, output)
            });
        }

        let mut slots: Vec<Option<Verdict>> = vec![None; self.panel.len()];
        let mut task_failure = None;

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, CastVoteOutput { verdict, tier })) => {
                    progress.on_verdict(&verdict, tier);
                    slots[index] = Some(verdict);
                }
                Err(e) => {
                    warn!("Evaluator task join error: {}", e);
                    task_failure.get_or_insert_with(|| e.to_string());
                }
            }
        }

        if let Some(message) = task_failure {
            return Err(RunConsensusError::EvaluatorTask(message));
        }

        let verdicts: Vec<Verdict> = slots.into_iter().flatten().collect();
        if verdicts.len() != self.panel.len() {
            return Err(RunConsensusError::EvaluatorTask(format!(
                "expected {} verdicts, got {}",
                self.panel.len(),
                verdicts.len()
            )));
        }

        let request = Arc::unwrap_or_clone(request);
        let decision = Decision::aggregate(request, verdicts, self.panel.rule());

        info!(
            "Decision for '{}': {} ({} yes / {} no / {} abstain, avg risk {})",
            decision.request.purpose,
            if decision.approved { "APPROVED" } else { "DENIED" },
            decision.yes_votes,
            decision.no_votes,
            decision.abstain_votes,
            decision.average_risk_score
        );

        self.results.record_decision(&decision);
        progress.on_decision(&decision);

        Ok(decision)
    }
}
