//! Aggregated panel decision

use super::rule::QuorumRule;
use super::vote::{Verdict, VoteChoice};
use crate::purchase::PurchaseRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one evaluation call across the whole panel
///
/// Built once by [`Decision::aggregate`] and never mutated afterwards.
///
/// # Example
///
/// ```
/// use quorum_domain::panel::Panel;
/// use quorum_domain::purchase::PurchaseRequest;
/// use quorum_domain::quorum::{Decision, QuorumRule, Verdict, VoteChoice};
///
/// let panel = Panel::default();
/// let votes = [VoteChoice::Yes, VoteChoice::Yes, VoteChoice::Yes, VoteChoice::Abstain, VoteChoice::Abstain];
/// let verdicts = panel
///     .profiles()
///     .iter()
///     .zip(votes)
///     .map(|(p, v)| Verdict::new(p, v, "", 4, ""))
///     .collect();
///
/// let decision = Decision::aggregate(PurchaseRequest::new(500.0, "API credits"), verdicts, QuorumRule::Majority);
/// assert!(decision.approved);
/// assert_eq!(decision.abstain_votes, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub approved: bool,
    pub yes_votes: usize,
    pub no_votes: usize,
    pub abstain_votes: usize,
    pub average_risk_score: f64,
    /// One verdict per panel member, in panel order
    #[serde(rename = "agent_votes")]
    pub verdicts: Vec<Verdict>,
    #[serde(rename = "purchase_request")]
    pub request: PurchaseRequest,
    pub rule: QuorumRule,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// Count votes, apply the quorum rule and average the risk scores
    pub fn aggregate(request: PurchaseRequest, verdicts: Vec<Verdict>, rule: QuorumRule) -> Self {
        let count = |choice: VoteChoice| verdicts.iter().filter(|v| v.vote == choice).count();
        let yes_votes = count(VoteChoice::Yes);
        let no_votes = count(VoteChoice::No);
        let abstain_votes = count(VoteChoice::Abstain);

        let approved = rule.is_satisfied(yes_votes, verdicts.len());
        let average_risk_score = average_risk_score(&verdicts);

        Self {
            approved,
            yes_votes,
            no_votes,
            abstain_votes,
            average_risk_score,
            verdicts,
            request,
            rule,
            decided_at: Utc::now(),
        }
    }

    pub fn total_votes(&self) -> usize {
        self.verdicts.len()
    }

    /// Generate a visual vote summary (e.g., "[●●○◌●]")
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        for verdict in &self.verdicts {
            summary.push(match verdict.vote {
                VoteChoice::Yes => '●',
                VoteChoice::No => '○',
                VoteChoice::Abstain => '◌',
            });
        }
        summary.push(']');
        summary
    }

    /// Verdicts of evaluators that could not be reached
    pub fn failed_verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.has_score())
    }
}

/// Mean risk score over verdicts that carry one, rounded to 2 decimals.
///
/// Zero scores mean "no score" (the evaluator failed), not "safest
/// possible", so they are left out. Returns 0 when nothing is left.
pub fn average_risk_score(verdicts: &[Verdict]) -> f64 {
    let scored: Vec<i64> = verdicts
        .iter()
        .filter(|v| v.has_score())
        .map(|v| v.risk_score)
        .collect();

    if scored.is_empty() {
        return 0.0;
    }

    let mean = scored.iter().sum::<i64>() as f64 / scored.len() as f64;
    (mean * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;

    fn verdicts(votes: &[VoteChoice], scores: &[i64]) -> Vec<Verdict> {
        let panel = Panel::default();
        panel
            .profiles()
            .iter()
            .zip(votes.iter().zip(scores))
            .map(|(p, (v, s))| Verdict::new(p, *v, "because", *s, ""))
            .collect()
    }

    fn decide(votes: &[VoteChoice], scores: &[i64]) -> Decision {
        Decision::aggregate(
            PurchaseRequest::new(100.0, "test"),
            verdicts(votes, scores),
            QuorumRule::Majority,
        )
    }

    use VoteChoice::{Abstain as A, No as N, Yes as Y};

    #[test]
    fn test_three_yes_two_abstain_approves() {
        let decision = decide(&[Y, Y, Y, A, A], &[5; 5]);
        assert!(decision.approved);
        assert_eq!(decision.yes_votes, 3);
        assert_eq!(decision.no_votes, 0);
        assert_eq!(decision.abstain_votes, 2);
    }

    #[test]
    fn test_two_yes_three_no_rejects() {
        let decision = decide(&[Y, N, Y, N, N], &[5; 5]);
        assert!(!decision.approved);
        assert_eq!(decision.yes_votes, 2);
        assert_eq!(decision.no_votes, 3);
    }

    #[test]
    fn test_approval_depends_only_on_yes_count() {
        // Every split of the non-YES votes between NO and ABSTAIN
        for yes in 0..=5usize {
            for no in 0..=(5 - yes) {
                let mut votes = vec![Y; yes];
                votes.extend(std::iter::repeat_n(N, no));
                votes.extend(std::iter::repeat_n(A, 5 - yes - no));
                let decision = decide(&votes, &[5; 5]);
                assert_eq!(decision.approved, yes >= 3, "yes={} no={}", yes, no);
                assert_eq!(
                    decision.yes_votes + decision.no_votes + decision.abstain_votes,
                    5
                );
            }
        }
    }

    #[test]
    fn test_average_excludes_zero_scores() {
        let decision = decide(&[Y, Y, Y, N, A], &[0, 6, 8, 4, 0]);
        assert_eq!(decision.average_risk_score, 6.0);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let decision = decide(&[Y; 5], &[1, 2, 2, 0, 0]);
        assert_eq!(decision.average_risk_score, 1.67);
    }

    #[test]
    fn test_average_zero_when_every_evaluator_failed() {
        let decision = decide(&[A; 5], &[0; 5]);
        assert_eq!(decision.average_risk_score, 0.0);
        assert!(!decision.approved);
        assert_eq!(decision.failed_verdicts().count(), 5);
    }

    #[test]
    fn test_average_risk_score_empty() {
        assert_eq!(average_risk_score(&[]), 0.0);
    }

    #[test]
    fn test_vote_summary() {
        let decision = decide(&[Y, N, A, Y, Y], &[5; 5]);
        assert_eq!(decision.vote_summary(), "[●○◌●●]");
    }

    #[test]
    fn test_serializes_dashboard_field_names() {
        let decision = decide(&[Y, Y, Y, N, N], &[3; 5]);
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["approved"], true);
        assert_eq!(json["agent_votes"].as_array().unwrap().len(), 5);
        assert_eq!(json["purchase_request"]["purpose"], "test");
        assert_eq!(json["rule"], "majority");
    }
}
