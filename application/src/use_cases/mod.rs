//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cast_vote;
pub mod complete_task;
pub mod run_consensus;
pub mod run_simulation;

#[cfg(test)]
pub(crate) mod test_support;
