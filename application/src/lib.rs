//! Application layer for spend-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BehaviorConfig, DEFAULT_PLANNER_MODEL, PlannerConfig};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    result_log::{InMemoryResultLog, ResultLog},
};
pub use use_cases::cast_vote::{CastVoteOutput, Evaluator};
pub use use_cases::complete_task::{ActionPlanner, CompleteTaskError};
pub use use_cases::run_consensus::{ConsensusEngine, RunConsensusError};
pub use use_cases::run_simulation::{RunSimulationUseCase, SimulationReport};
