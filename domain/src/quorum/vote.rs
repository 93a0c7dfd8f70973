//! Vote types for panel consensus
//!
//! This module defines the voting primitives produced by each evaluator.

use crate::panel::EvaluatorProfile;
use serde::{Deserialize, Serialize};

/// Risk score recorded when the evaluator could not be reached at all
pub const NO_SCORE: i64 = 0;

/// Risk score used whenever an evaluator answered without a usable score
pub const NEUTRAL_RISK_SCORE: i64 = 5;

/// One evaluator's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
}

impl VoteChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "YES",
            VoteChoice::No => "NO",
            VoteChoice::Abstain => "ABSTAIN",
        }
    }

    /// Interpret a vote string from a structured evaluator reply.
    ///
    /// Case and surrounding whitespace are ignored; anything other than
    /// YES/NO/ABSTAIN is treated as an abstention.
    pub fn from_reply(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "YES" => VoteChoice::Yes,
            "NO" => VoteChoice::No,
            _ => VoteChoice::Abstain,
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single evaluator's structured verdict on one purchase request
///
/// # Example
///
/// ```
/// use quorum_domain::panel::Panel;
/// use quorum_domain::quorum::{Verdict, VoteChoice};
///
/// let panel = Panel::default();
/// let cfo = &panel.profiles()[0];
///
/// let verdict = Verdict::new(cfo, VoteChoice::Yes, "Clear ROI", 3, "");
/// assert_eq!(verdict.agent_name, "CFO Agent");
/// assert!(verdict.has_score());
///
/// let failed = Verdict::from_error(cfo, "connection refused");
/// assert_eq!(failed.vote, VoteChoice::Abstain);
/// assert_eq!(failed.risk_score, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub agent_name: String,
    /// Display label of the evaluator (serialized as `emoji` for dashboard clients)
    #[serde(rename = "emoji")]
    pub label: String,
    pub vote: VoteChoice,
    pub reasoning: String,
    pub risk_score: i64,
    pub conditions: String,
    pub model: String,
}

impl Verdict {
    pub fn new(
        profile: &EvaluatorProfile,
        vote: VoteChoice,
        reasoning: impl Into<String>,
        risk_score: i64,
        conditions: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: profile.name.clone(),
            label: profile.label.clone(),
            vote,
            reasoning: reasoning.into(),
            risk_score,
            conditions: conditions.into(),
            model: profile.model.clone(),
        }
    }

    /// Verdict for an evaluator whose text-generation call failed.
    ///
    /// This is the only path that records a zero risk score.
    pub fn from_error(profile: &EvaluatorProfile, description: impl std::fmt::Display) -> Self {
        Self::new(
            profile,
            VoteChoice::Abstain,
            format!("Error occurred: {}", description),
            NO_SCORE,
            "",
        )
    }

    /// Whether this verdict carries a risk score that counts toward the average
    pub fn has_score(&self) -> bool {
        self.risk_score > NO_SCORE
    }
}
