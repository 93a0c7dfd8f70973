//! Infrastructure layer for spend-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEvaluatorConfig, FileGatewayConfig,
    FileOutputConfig, FileOutputFormat,
};
pub use gateway::OpenAiCompatibleGateway;
pub use logging::JsonlConversationLogger;
