//! Planned actions produced by the planning step

use crate::purchase::{DEFAULT_EXPECTED_ROI, PurchaseRequest, Urgency};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn default_expected_roi() -> String {
    DEFAULT_EXPECTED_ROI.to_string()
}

/// Accept `500`, `500.0` or a numeric string such as `"500"` or `"$1,200"`
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("amount is out of range")),
        Value::String(text) => text
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| D::Error::custom(format!("amount is not a number: {:?}", text))),
        other => Err(D::Error::custom(format!(
            "amount must be a number, found {}",
            other
        ))),
    }
}

/// One step of an agent's plan
///
/// Serialized with an uppercase `type` tag, matching what the planner is
/// asked to produce:
///
/// ```json
/// {"type": "HIRE_AGENT", "agent_type": "Design Agent", "amount": 300,
///  "task": "Create landing page", "justification": "...", "expected_roi": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlannedAction {
    RequestPurchase {
        #[serde(deserialize_with = "lenient_amount")]
        amount: f64,
        purpose: String,
        #[serde(default)]
        justification: String,
        #[serde(default = "default_expected_roi")]
        expected_roi: String,
        #[serde(default)]
        urgency: Option<Urgency>,
    },
    HireAgent {
        agent_type: String,
        #[serde(deserialize_with = "lenient_amount")]
        amount: f64,
        task: String,
        #[serde(default)]
        justification: String,
        #[serde(default = "default_expected_roi")]
        expected_roi: String,
    },
    /// Terminal marker, never evaluated
    Complete,
}

impl PlannedAction {
    /// Build the purchase request this action submits to the panel.
    ///
    /// `budget` is the agent's *initial* budget: every action in a plan sees
    /// the same figure, regardless of what earlier actions were approved.
    /// Returns `None` for [`PlannedAction::Complete`].
    pub fn to_purchase_request(&self, agent_name: &str, budget: f64) -> Option<PurchaseRequest> {
        match self {
            PlannedAction::RequestPurchase {
                amount,
                purpose,
                justification,
                expected_roi,
                urgency,
            } => Some(
                PurchaseRequest::new(*amount, purpose.clone())
                    .with_requesting_agent(agent_name)
                    .with_justification(justification.clone())
                    .with_expected_roi(expected_roi.clone())
                    .with_urgency(urgency.unwrap_or_default())
                    .with_budget_remaining(budget),
            ),
            PlannedAction::HireAgent {
                agent_type,
                amount,
                task,
                justification,
                expected_roi,
            } => Some(
                PurchaseRequest::new(*amount, format!("Hire {} for {}", agent_type, task))
                    .with_requesting_agent(agent_name)
                    .with_justification(justification.clone())
                    .with_expected_roi(expected_roi.clone())
                    .with_urgency(Urgency::Medium)
                    .with_budget_remaining(budget),
            ),
            PlannedAction::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PlannedAction::Complete)
    }

    /// Requested amount (0 for the terminal marker)
    pub fn amount(&self) -> f64 {
        match self {
            PlannedAction::RequestPurchase { amount, .. } | PlannedAction::HireAgent { amount, .. } => {
                *amount
            }
            PlannedAction::Complete => 0.0,
        }
    }
}

/// What the planner decided to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub reasoning: String,
    pub actions: Vec<PlannedAction>,
}

impl ActionPlan {
    pub fn new(reasoning: impl Into<String>, actions: Vec<PlannedAction>) -> Self {
        Self {
            reasoning: reasoning.into(),
            actions,
        }
    }

    /// A plan with no actions, e.g. when the planner reply was unusable
    pub fn empty(reasoning: impl Into<String>) -> Self {
        Self::new(reasoning, Vec::new())
    }
}
