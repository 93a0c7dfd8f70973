//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use quorum_application::{BehaviorConfig, DEFAULT_PLANNER_MODEL, PlannerConfig};
use quorum_domain::{EvaluatorProfile, OutputFormat, PANEL_SIZE, Panel, QuorumRule, RiskPolicy};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export OutputFormat from domain for convenience
pub use quorum_domain::OutputFormat as FileOutputFormat;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.dedaluslabs.ai/v1";

/// Environment variable holding the API key by default
pub const DEFAULT_API_KEY_ENV: &str = "DEDALUS_API_KEY";

/// Default listen address of the HTTP API
pub const DEFAULT_BIND: &str = "127.0.0.1:5001";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty ({0})")]
    EmptyModelName(String),

    #[error("[[panel]] must list exactly {expected} evaluators, found {actual}")]
    InvalidPanelSize { expected: usize, actual: usize },

    #[error("gateway.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("invalid quorum.rule: {0}")]
    InvalidQuorumRule(String),

    #[error("quorum.rule needs {required} approvals but the panel has only {panel_size} evaluators")]
    UnreachableQuorum { required: usize, panel_size: usize },

    #[error("invalid server.bind address '{0}'")]
    InvalidBind(String),
}

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,
    /// Name of the environment variable that holds the API key
    pub api_key_env: String,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Timeout in seconds for each gateway call
    pub timeout_seconds: Option<u64>,
    /// Clamp structured risk scores into 0..=10
    pub clamp_risk_scores: bool,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Some(120),
            clamp_risk_scores: true,
        }
    }
}

/// Raw planner configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    pub model: String,
    pub concurrent_actions: bool,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_PLANNER_MODEL.to_string(),
            concurrent_actions: false,
        }
    }
}

/// Raw quorum configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    /// "majority", "unanimous" or "atleast:N"
    pub rule: String,
}

impl Default for FileQuorumConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// One `[[panel]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvaluatorConfig {
    pub name: String,
    pub role: String,
    pub model: String,
    pub persona: String,
    #[serde(default)]
    pub label: String,
}

impl From<&FileEvaluatorConfig> for EvaluatorProfile {
    fn from(entry: &FileEvaluatorConfig) -> Self {
        EvaluatorProfile::new(
            entry.name.clone(),
            entry.role.clone(),
            entry.model.clone(),
            entry.persona.clone(),
            entry.label.clone(),
        )
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gateway settings
    pub gateway: FileGatewayConfig,
    /// Behavior settings
    pub behavior: FileBehaviorConfig,
    /// Planner settings
    pub planner: FilePlannerConfig,
    /// Approval rule
    pub quorum: FileQuorumConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// HTTP API settings
    pub server: FileServerConfig,
    /// Panel override; empty means the built-in panel
    pub panel: Vec<FileEvaluatorConfig>,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.behavior.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        if self.planner.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName(
                "planner.model".to_string(),
            ));
        }

        if !self.panel.is_empty() {
            if self.panel.len() != PANEL_SIZE {
                return Err(ConfigValidationError::InvalidPanelSize {
                    expected: PANEL_SIZE,
                    actual: self.panel.len(),
                });
            }
            for entry in &self.panel {
                if entry.model.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyModelName(format!(
                        "panel '{}'",
                        entry.name
                    )));
                }
            }
        }

        if let QuorumRule::AtLeast(required) = self.quorum_rule()?
            && required > PANEL_SIZE
        {
            return Err(ConfigValidationError::UnreachableQuorum {
                required,
                panel_size: PANEL_SIZE,
            });
        }
        self.bind_addr()?;

        Ok(())
    }

    pub fn quorum_rule(&self) -> Result<QuorumRule, ConfigValidationError> {
        self.quorum
            .rule
            .parse()
            .map_err(ConfigValidationError::InvalidQuorumRule)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigValidationError::InvalidBind(self.server.bind.clone()))
    }

    /// The configured panel, or the built-in one when `[[panel]]` is absent
    pub fn panel(&self) -> Result<Panel, ConfigValidationError> {
        let panel = if self.panel.is_empty() {
            Panel::default()
        } else {
            let profiles = self.panel.iter().map(EvaluatorProfile::from).collect();
            Panel::new(profiles).map_err(|_| ConfigValidationError::InvalidPanelSize {
                expected: PANEL_SIZE,
                actual: self.panel.len(),
            })?
        };
        Ok(panel.with_rule(self.quorum_rule()?))
    }

    pub fn behavior_config(&self) -> BehaviorConfig {
        let risk_policy = if self.behavior.clamp_risk_scores {
            RiskPolicy::Clamp
        } else {
            RiskPolicy::PassThrough
        };
        BehaviorConfig {
            timeout: self.behavior.timeout_seconds.map(Duration::from_secs),
            risk_policy,
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::new(self.planner.model.clone())
            .with_concurrent_actions(self.planner.concurrent_actions)
    }
}
