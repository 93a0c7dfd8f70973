//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as gateway timeouts and how evaluator risk scores are treated.

use quorum_domain::RiskPolicy;
use std::time::Duration;

/// Model the planner asks for a plan when nothing else is configured
pub const DEFAULT_PLANNER_MODEL: &str = "openai/gpt-4.1";

/// Default per-call timeout for gateway requests
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Maximum time to wait for a single gateway call. `None` waits forever.
    pub timeout: Option<Duration>,
    /// What to do with risk scores outside 0..=10
    pub risk_policy: RiskPolicy,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
            risk_policy: RiskPolicy::default(),
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Self::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_risk_policy(mut self, policy: RiskPolicy) -> Self {
        self.risk_policy = policy;
        self
    }
}

/// How the planner runs
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub model: String,
    /// Evaluate a plan's actions concurrently instead of one after another
    pub concurrent_actions: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_PLANNER_MODEL.to_string(),
            concurrent_actions: false,
        }
    }
}

impl PlannerConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_concurrent_actions(mut self, concurrent: bool) -> Self {
        self.concurrent_actions = concurrent;
        self
    }
}
