//! Scripted gateway shared by the use-case tests

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

type Responder = dyn Fn(&str, &str) -> Result<String, GatewayError> + Send + Sync;

/// Gateway whose replies are computed from (prompt, model)
pub(crate) struct ScriptedGateway {
    responder: Box<Responder>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub(crate) fn new(
        responder: impl Fn(&str, &str) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call replies with `reply`
    pub(crate) fn always(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// (prompt, model) of every call so far
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt, model)
    }
}

/// A well-formed evaluator reply
pub(crate) fn vote_json(vote: &str, risk: i64) -> String {
    format!(
        r#"{{"vote": "{}", "reasoning": "scripted", "risk_score": {}, "conditions": ""}}"#,
        vote, risk
    )
}
