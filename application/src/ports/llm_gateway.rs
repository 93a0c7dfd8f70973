//! LLM Gateway port
//!
//! Defines the interface for communicating with text-generation providers.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for text generation
///
/// One prompt in, one completion out. Implementations (adapters) live in the
/// infrastructure layer; every failure is reported as a [`GatewayError`].
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send `prompt` to `model` and return the raw text of the reply
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError>;
}
