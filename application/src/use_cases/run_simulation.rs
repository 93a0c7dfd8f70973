//! Run Simulation use case
//!
//! Several autonomous agents pursue their goals at the same time, all
//! spending through the same panel.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::complete_task::{ActionPlanner, CompleteTaskError};
use futures::future::join_all;
use quorum_domain::{TaskOutcome, TaskRequest};
use serde::Serialize;
use tracing::info;

/// Combined result of a multi-agent simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// One outcome per agent, in the order the tasks were given
    pub outcomes: Vec<TaskOutcome>,
}

impl SimulationReport {
    pub fn total_spent(&self) -> f64 {
        self.outcomes.iter().map(|o| o.total_spent).sum()
    }

    pub fn approved_actions(&self) -> usize {
        self.outcomes.iter().map(|o| o.approved_count()).sum()
    }

    pub fn denied_actions(&self) -> usize {
        self.outcomes.iter().map(|o| o.denied_count()).sum()
    }
}

/// Use case for running several agents concurrently
pub struct RunSimulationUseCase<'a, G: LlmGateway + 'static> {
    planner: &'a ActionPlanner<G>,
}

impl<'a, G: LlmGateway + 'static> RunSimulationUseCase<'a, G> {
    pub fn new(planner: &'a ActionPlanner<G>) -> Self {
        Self { planner }
    }

    pub async fn execute(&self, tasks: Vec<TaskRequest>) -> Result<SimulationReport, CompleteTaskError> {
        self.execute_with_progress(tasks, &NoProgress).await
    }

    /// Every task is validated before any agent starts planning
    pub async fn execute_with_progress(
        &self,
        tasks: Vec<TaskRequest>,
        progress: &dyn ProgressNotifier,
    ) -> Result<SimulationReport, CompleteTaskError> {
        for task in &tasks {
            task.validate()?;
        }

        info!("Starting simulation with {} agents", tasks.len());

        let outcomes = join_all(
            tasks
                .into_iter()
                .map(|task| self.planner.complete_task_with_progress(task, progress)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let report = SimulationReport { outcomes };
        info!(
            "Simulation finished: {} approved, {} denied, ${} spent",
            report.approved_actions(),
            report.denied_actions(),
            report.total_spent()
        );
        Ok(report)
    }
}
