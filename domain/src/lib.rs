//! Domain layer for spend-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A fixed set of five evaluator profiles. Every purchase request is put in
//! front of the whole panel, and each evaluator renders one [`Verdict`].
//!
//! ## Quorum
//!
//! Verdicts are aggregated into a [`Decision`] under a strict-majority
//! [`QuorumRule`]: with five evaluators, three YES votes approve.
//!
//! ## Planning
//!
//! An autonomous agent plans [`PlannedAction`]s; each purchase or hire goes
//! through the same quorum gate and its [`ActionOutcome`] is accumulated into
//! a [`TaskOutcome`] ledger.

pub mod config;
pub mod core;
pub mod panel;
pub mod planning;
pub mod prompt;
pub mod purchase;
pub mod quorum;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use panel::{EvaluatorProfile, PANEL_SIZE, Panel};
pub use planning::{
    ActionKind, ActionOutcome, ActionPlan, DEFAULT_TASK_BUDGET, PlanParse, PlannedAction,
    TaskOutcome, TaskRequest, parse_action_plan,
};
pub use prompt::PromptTemplate;
pub use purchase::{PurchaseRequest, Urgency};

// Re-export quorum types
pub use quorum::{
    Decision, ParseTier, QuorumRule, ResponseParser, RiskPolicy, VoteChoice, Verdict,
    average_risk_score, parse_verdict,
};
