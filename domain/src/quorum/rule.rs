//! Quorum rules for consensus determination
//!
//! This module defines the rules used to determine whether a purchase passes.

use serde::{Deserialize, Serialize};

/// Rule for determining whether the panel approved a request
///
/// ABSTAIN verdicts count toward the total but never toward approval, so
/// `Majority` on a five-member panel always needs three YES votes no matter
/// how the remainder splits between NO and ABSTAIN.
///
/// - `Majority`: strictly more than half must vote YES (default)
/// - `Unanimous`: every evaluator must vote YES
/// - `AtLeast(n)`: at least n YES votes
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert!(rule.is_satisfied(3, 5));
/// assert!(!rule.is_satisfied(2, 5));
/// assert_eq!(rule.min_approvals_needed(5), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuorumRule {
    /// Strictly more than half must approve: ⌈(n+1)/2⌉
    #[default]
    Majority,

    /// All participants must approve
    Unanimous,

    /// At least n votes must approve
    AtLeast(usize),
}

impl QuorumRule {
    /// Check if the rule is satisfied given YES count and panel size
    pub fn is_satisfied(&self, approvals: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        approvals >= self.min_approvals_needed(total)
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half)".to_string(),
            QuorumRule::Unanimous => "unanimous (all must approve)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} approvals", n),
        }
    }

    /// Get the minimum YES votes needed for this rule given a panel size
    pub fn min_approvals_needed(&self, total: usize) -> usize {
        match self {
            QuorumRule::Majority => total / 2 + 1,
            QuorumRule::Unanimous => total,
            QuorumRule::AtLeast(n) => *n,
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                if n == 0 {
                    return Err("atleast:N requires N >= 1".to_string());
                }
                Ok(QuorumRule::AtLeast(n))
            }
            _ => Err(format!(
                "Unknown quorum rule: {}. Valid: majority, unanimous, atleast:N",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_of_five_needs_three() {
        let rule = QuorumRule::Majority;
        assert!(!rule.is_satisfied(2, 5));
        assert!(rule.is_satisfied(3, 5));
        assert!(rule.is_satisfied(5, 5));
    }

    #[test]
    fn test_majority_matches_ceil_formula() {
        // ⌈(n+1)/2⌉ for every panel size up to 9
        for n in 1..=9usize {
            let expected = (n + 1).div_ceil(2);
            assert_eq!(QuorumRule::Majority.min_approvals_needed(n), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_unanimous_rule() {
        let rule = QuorumRule::Unanimous;
        assert!(!rule.is_satisfied(4, 5));
        assert!(rule.is_satisfied(5, 5));
    }

    #[test]
    fn test_at_least_rule() {
        let rule = QuorumRule::AtLeast(4);
        assert!(!rule.is_satisfied(3, 5));
        assert!(rule.is_satisfied(4, 5));
    }

    #[test]
    fn test_zero_total() {
        assert!(!QuorumRule::Majority.is_satisfied(0, 0));
        assert!(!QuorumRule::Unanimous.is_satisfied(0, 0));
        assert!(!QuorumRule::AtLeast(1).is_satisfied(0, 0));
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!("majority".parse::<QuorumRule>(), Ok(QuorumRule::Majority));
        assert_eq!("Unanimous".parse::<QuorumRule>(), Ok(QuorumRule::Unanimous));
        assert_eq!("atleast:4".parse::<QuorumRule>(), Ok(QuorumRule::AtLeast(4)));
        assert_eq!("at_least:2".parse::<QuorumRule>(), Ok(QuorumRule::AtLeast(2)));
        assert!("atleast:0".parse::<QuorumRule>().is_err());
        assert!("supermajority".parse::<QuorumRule>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(QuorumRule::Majority.to_string(), "majority (more than half)");
        assert_eq!(QuorumRule::AtLeast(2).to_string(), "at least 2 approvals");
    }
}
