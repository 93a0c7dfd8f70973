//! Evaluator profiles and the fixed voting panel

use crate::core::error::DomainError;
use crate::quorum::rule::QuorumRule;
use serde::{Deserialize, Serialize};

/// Number of evaluators on the panel
pub const PANEL_SIZE: usize = 5;

/// A configured voting participant
///
/// `model` is opaque to the domain: it names whatever text-generation
/// configuration backs this evaluator (e.g. `"openai/gpt-4.1"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorProfile {
    pub name: String,
    pub role: String,
    pub model: String,
    pub persona: String,
    /// Display label (usually an emoji)
    pub label: String,
}

impl EvaluatorProfile {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        model: impl Into<String>,
        persona: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            model: model.into(),
            persona: persona.into(),
            label: label.into(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidProfile(
                "evaluator name cannot be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(DomainError::InvalidProfile(format!(
                "evaluator '{}' has an empty model identifier",
                self.name
            )));
        }
        Ok(())
    }
}

/// The fixed panel of evaluators
///
/// Always holds exactly [`PANEL_SIZE`] profiles. Approval requires a strict
/// majority of YES votes across the whole panel.
///
/// # Example
///
/// ```
/// use quorum_domain::panel::Panel;
///
/// let panel = Panel::default();
/// assert_eq!(panel.len(), 5);
/// assert_eq!(panel.quorum_threshold(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    profiles: Vec<EvaluatorProfile>,
    rule: QuorumRule,
}

impl Panel {
    /// Build a panel from configured profiles.
    ///
    /// Fails unless exactly [`PANEL_SIZE`] valid profiles are supplied.
    pub fn new(profiles: Vec<EvaluatorProfile>) -> Result<Self, DomainError> {
        if profiles.len() != PANEL_SIZE {
            return Err(DomainError::InvalidPanel {
                expected: PANEL_SIZE,
                actual: profiles.len(),
            });
        }
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self {
            profiles,
            rule: QuorumRule::Majority,
        })
    }

    /// Replace the approval rule
    pub fn with_rule(mut self, rule: QuorumRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn profiles(&self) -> &[EvaluatorProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn rule(&self) -> QuorumRule {
        self.rule
    }

    /// Minimum YES votes required for approval
    pub fn quorum_threshold(&self) -> usize {
        self.rule.min_approvals_needed(self.len())
    }

    /// The built-in panel of five differently-minded evaluators
    pub fn default_profiles() -> Vec<EvaluatorProfile> {
        vec![
            EvaluatorProfile::new(
                "CFO Agent",
                "Conservative financial oversight",
                "anthropic/claude-sonnet-4-20250514",
                "You are a conservative CFO focused on cost control and ROI. You scrutinize every expense and require clear business justification. You vote YES only when the ROI is crystal clear.",
                "💼",
            ),
            EvaluatorProfile::new(
                "Growth Agent",
                "Aggressive expansion focus",
                "openai/gpt-4.1",
                "You are a growth-obsessed executive who believes in aggressive investment. You vote YES when you see potential for scale and market capture, even if ROI isn't immediate.",
                "🚀",
            ),
            EvaluatorProfile::new(
                "Risk Assessment Agent",
                "Risk analysis and mitigation",
                "xai/grok-2-1212",
                "You are a risk management specialist. You evaluate potential downsides, security concerns, and vendor reliability. You vote based on risk-adjusted returns.",
                "🛡️",
            ),
            EvaluatorProfile::new(
                "Operations Agent",
                "Practical implementation focus",
                "openai/gpt-4o-mini",
                "You are an operations manager focused on practicality and execution. You vote YES when the purchase solves a real operational problem and is easy to implement.",
                "⚙️",
            ),
            EvaluatorProfile::new(
                "Data Agent",
                "Evidence-based decision making",
                "openai/o1",
                "You are a data scientist who makes decisions based purely on metrics and evidence. You vote YES only when data supports the decision.",
                "📊",
            ),
        ]
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            profiles: Self::default_profiles(),
            rule: QuorumRule::Majority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> EvaluatorProfile {
        EvaluatorProfile::new(name, "role", "model-x", "persona", "*")
    }

    #[test]
    fn test_default_panel() {
        let panel = Panel::default();
        assert_eq!(panel.len(), PANEL_SIZE);
        assert_eq!(panel.profiles()[0].name, "CFO Agent");
        assert_eq!(panel.profiles()[4].model, "openai/o1");
        assert_eq!(panel.rule(), QuorumRule::Majority);
    }

    #[test]
    fn test_quorum_threshold_is_strict_majority() {
        assert_eq!(Panel::default().quorum_threshold(), 3);
    }

    #[test]
    fn test_new_rejects_wrong_size() {
        let err = Panel::new(vec![profile("a"), profile("b")]).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidPanel {
                expected: 5,
                actual: 2
            }
        );
    }

    #[test]
    fn test_new_rejects_empty_model() {
        let mut profiles: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|n| profile(n)).collect();
        profiles[2].model = " ".to_string();
        let err = Panel::new(profiles).unwrap_err();
        assert!(matches!(err, DomainError::InvalidProfile(_)));
    }

    #[test]
    fn test_new_accepts_five_profiles() {
        let profiles: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|n| profile(n)).collect();
        let panel = Panel::new(profiles).unwrap();
        assert_eq!(panel.profiles()[3].name, "d");
    }

    #[test]
    fn test_with_rule() {
        let panel = Panel::default().with_rule(QuorumRule::Unanimous);
        assert_eq!(panel.rule(), QuorumRule::Unanimous);
        assert_eq!(panel.quorum_threshold(), 5);
    }
}
