//! Port for the structured transcript of gateway traffic.
//!
//! Every prompt sent to an evaluator or planner, and every raw reply that
//! came back, can be recorded here as one machine-readable event. This is
//! separate from `tracing`: tracing carries diagnostics, the transcript
//! carries the full text the panel actually saw.

use serde_json::{Value, json};

/// A single transcript event
pub struct ConversationEvent {
    /// Event type identifier (e.g. "evaluation_prompt", "planner_reply")
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn evaluation_prompt(agent: &str, model: &str, prompt: &str) -> Self {
        Self::new(
            "evaluation_prompt",
            json!({ "agent": agent, "model": model, "prompt": prompt }),
        )
    }

    pub fn evaluator_reply(agent: &str, model: &str, reply: &str, tier: &str) -> Self {
        Self::new(
            "evaluator_reply",
            json!({ "agent": agent, "model": model, "reply": reply, "parse_tier": tier }),
        )
    }

    pub fn evaluator_error(agent: &str, model: &str, error: &str) -> Self {
        Self::new(
            "evaluator_error",
            json!({ "agent": agent, "model": model, "error": error }),
        )
    }

    pub fn planner_reply(agent: &str, model: &str, reply: &str, skipped_actions: usize) -> Self {
        Self::new(
            "planner_reply",
            json!({
                "agent": agent,
                "model": model,
                "reply": reply,
                "skipped_actions": skipped_actions,
            }),
        )
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and infallible: a transcript that cannot be written
/// must never change a vote.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when no transcript was requested.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
