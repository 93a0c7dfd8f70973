//! Purchase request value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default for [`PurchaseRequest::expected_roi`]
pub const DEFAULT_EXPECTED_ROI: &str = "Not specified";

/// Default for [`PurchaseRequest::budget_remaining`]
pub const DEFAULT_BUDGET_REMAINING: f64 = 10_000.0;

/// How urgently the requester needs the purchase
///
/// Deserialization is lenient: the level is matched case-insensitively and
/// anything unrecognized (`"Critical"`, `"ASAP"`, a number) reads as
/// [`Urgency::Medium`], so a free-form urgency never rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl<'de> Deserialize<'de> for Urgency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => text.parse().unwrap_or_default(),
            _ => Urgency::default(),
        })
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(format!(
                "Unknown urgency: {}. Valid: low, medium, high",
                other
            )),
        }
    }
}

fn default_expected_roi() -> String {
    DEFAULT_EXPECTED_ROI.to_string()
}

fn default_budget_remaining() -> f64 {
    DEFAULT_BUDGET_REMAINING
}

/// A request to spend money, submitted to the panel for approval
///
/// `amount` and `purpose` are required; everything else has a default.
/// Once handed to the consensus engine the request is never mutated.
///
/// # Example
///
/// ```
/// use quorum_domain::purchase::{PurchaseRequest, Urgency};
///
/// let request = PurchaseRequest::new(500.0, "OpenAI API credits")
///     .with_requesting_agent("Customer Service Agent")
///     .with_urgency(Urgency::High);
///
/// assert_eq!(request.expected_roi, "Not specified");
/// assert_eq!(request.budget_remaining, 10_000.0);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub amount: f64,
    pub purpose: String,
    #[serde(default)]
    pub requesting_agent: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default = "default_expected_roi")]
    pub expected_roi: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default = "default_budget_remaining")]
    pub budget_remaining: f64,
}

impl PurchaseRequest {
    /// Create a request with defaults for all optional fields
    pub fn new(amount: f64, purpose: impl Into<String>) -> Self {
        Self {
            amount,
            purpose: purpose.into(),
            requesting_agent: String::new(),
            justification: String::new(),
            expected_roi: default_expected_roi(),
            urgency: Urgency::default(),
            budget_remaining: DEFAULT_BUDGET_REMAINING,
        }
    }

    pub fn with_requesting_agent(mut self, agent: impl Into<String>) -> Self {
        self.requesting_agent = agent.into();
        self
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = justification.into();
        self
    }

    pub fn with_expected_roi(mut self, roi: impl Into<String>) -> Self {
        self.expected_roi = roi.into();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_budget_remaining(mut self, budget: f64) -> Self {
        self.budget_remaining = budget;
        self
    }

    /// Reject requests that cannot be meaningfully evaluated.
    ///
    /// Required fields are never silently defaulted: a missing purpose or a
    /// negative amount is reported to the caller.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.amount.is_finite() {
            return Err(DomainError::InvalidRequest(
                "amount must be a finite number".to_string(),
            ));
        }
        if self.amount < 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "amount must be non-negative, got {}",
                self.amount
            )));
        }
        if self.purpose.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "purpose is required".to_string(),
            ));
        }
        if !self.budget_remaining.is_finite() {
            return Err(DomainError::InvalidRequest(
                "budget_remaining must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Render a monetary amount the way a person would write it.
///
/// Whole numbers print without decimals (`500`), anything else with two
/// (`499.99`).
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PurchaseRequest::new(100.0, "Slack");
        assert_eq!(request.expected_roi, DEFAULT_EXPECTED_ROI);
        assert_eq!(request.urgency, Urgency::Medium);
        assert_eq!(request.budget_remaining, DEFAULT_BUDGET_REMAINING);
        assert!(request.requesting_agent.is_empty());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{"amount": 500, "purpose": "API credits", "requesting_agent": "CS"}"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, 500.0);
        assert_eq!(request.expected_roi, "Not specified");
        assert_eq!(request.urgency, Urgency::Medium);
        assert_eq!(request.budget_remaining, 10_000.0);
    }

    #[test]
    fn test_deserialize_requires_amount_and_purpose() {
        assert!(serde_json::from_str::<PurchaseRequest>(r#"{"purpose": "x"}"#).is_err());
        assert!(serde_json::from_str::<PurchaseRequest>(r#"{"amount": 1}"#).is_err());
    }

    #[test]
    fn test_urgency_accepts_lowercase() {
        let json = r#"{"amount": 1, "purpose": "x", "urgency": "high"}"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.urgency, Urgency::High);

        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized["urgency"], "High");
    }

    #[test]
    fn test_unknown_urgency_reads_as_medium() {
        let json = r#"{"amount": 1, "purpose": "x", "urgency": "Critical"}"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.urgency, Urgency::Medium);

        let json = r#"{"amount": 1, "purpose": "x", "urgency": 3}"#;
        let request: PurchaseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.urgency, Urgency::Medium);
    }

    #[test]
    fn test_urgency_from_str() {
        assert_eq!("LOW".parse::<Urgency>(), Ok(Urgency::Low));
        assert_eq!(" medium ".parse::<Urgency>(), Ok(Urgency::Medium));
        assert!("urgent".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let err = PurchaseRequest::new(-1.0, "x").validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_nan_amount() {
        assert!(PurchaseRequest::new(f64::NAN, "x").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_purpose() {
        let err = PurchaseRequest::new(10.0, "   ").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid purchase request: purpose is required"
        );
    }

    #[test]
    fn test_validate_accepts_zero_amount() {
        assert!(PurchaseRequest::new(0.0, "free tier").validate().is_ok());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(500.0), "500");
        assert_eq!(format_amount(499.99), "499.99");
        assert_eq!(format_amount(-400.0), "-400");
    }
}
