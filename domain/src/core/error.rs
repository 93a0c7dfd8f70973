//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Only caller-supplied input can fail in the domain; evaluator output never
/// does (see [`crate::quorum::parsing`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid purchase request: {0}")]
    InvalidRequest(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Invalid panel: expected {expected} evaluators, got {actual}")]
    InvalidPanel { expected: usize, actual: usize },

    #[error("Invalid evaluator profile: {0}")]
    InvalidProfile(String),
}

impl DomainError {
    /// Check if this error was caused by caller input (as opposed to configuration)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRequest(_) | DomainError::InvalidTask(_)
        )
    }
}
