//! Text-generation gateway adapters
//!
//! Implements the [`LlmGateway`](quorum_application::LlmGateway) port over
//! HTTP.

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleGateway;
