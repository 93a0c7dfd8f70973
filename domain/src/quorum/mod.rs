//! Quorum consensus domain
//!
//! This module contains the core concepts for panel-based purchase approval.
//!
//! # Flow
//!
//! ```text
//!   raw evaluator text ──▶ parsing ──▶ Verdict ─┐
//!   raw evaluator text ──▶ parsing ──▶ Verdict ─┤
//!                 ...                           ├──▶ Decision::aggregate ──▶ Decision
//!   raw evaluator text ──▶ parsing ──▶ Verdict ─┘        (QuorumRule)
//! ```
//!
//! Parsing never fails: malformed text degrades through the tiers documented
//! in [`parsing`]. Aggregation is deterministic given the verdicts.

pub mod decision;
pub mod parsing;
pub mod rule;
pub mod vote;

// Re-export main types
pub use decision::{Decision, average_risk_score};
pub use parsing::{ParseTier, ResponseParser, RiskPolicy, parse_verdict};
pub use rule::QuorumRule;
pub use vote::{VoteChoice, Verdict};
