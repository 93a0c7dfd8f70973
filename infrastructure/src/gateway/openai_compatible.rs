//! Gateway for any OpenAI-compatible `/chat/completions` endpoint
//!
//! The model identifier is passed through untouched (`"openai/gpt-4.1"`,
//! `"xai/grok-2-1212"`, ...), so a routing provider can serve every panel
//! member from one base URL.

use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use quorum_application::ports::llm_gateway::{GatewayError, LlmGateway};
use quorum_domain::core::string::truncate;
use serde_json::{Value, json};
use tracing::debug;

/// Longest error body kept in a [`GatewayError::HttpStatus`]
const MAX_ERROR_BODY_LEN: usize = 500;

pub struct OpenAiCompatibleGateway {
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleGateway {
    /// `api_key_env` is only used to name the variable in error messages
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_key_env: api_key_env.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from the `[gateway]` section, reading the key from the environment
    pub fn from_config(config: &FileGatewayConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::new(config.base_url.clone(), api_key, config.api_key_env.clone())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingApiKey(self.api_key_env.clone()))?;

        let payload = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!(model, url = %self.endpoint(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate(&body, MAX_ERROR_BODY_LEN);
            if status.as_u16() == 404 {
                return Err(GatewayError::ModelNotAvailable(format!("{}: {}", model, body)));
            }
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        completion_text(&data)
    }
}

/// Text of the first choice of a chat completion body
fn completion_text(data: &Value) -> Result<String, GatewayError> {
    let choice = data
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| GatewayError::MalformedResponse("No choices in response".to_string()))?;

    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MalformedResponse("Empty content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn test_completion_text() {
        assert_eq!(completion_text(&completion("hi")).unwrap(), "hi");
        assert!(matches!(
            completion_text(&json!({ "choices": [] })),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            completion_text(&json!({ "choices": [{ "message": { "content": null } }] })),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let gateway = OpenAiCompatibleGateway::new("http://localhost/v1/", None, "KEY");
        assert_eq!(gateway.endpoint(), "http://localhost/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let gateway = OpenAiCompatibleGateway::new("http://127.0.0.1:9", None, "DEDALUS_API_KEY");
        let err = gateway.generate("hello", "openai/gpt-4.1").await.unwrap_err();
        assert_eq!(err, GatewayError::MissingApiKey("DEDALUS_API_KEY".to_string()));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({ "model": "openai/gpt-4.1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"vote": "YES"}"#)))
            .mount(&server)
            .await;

        let gateway = OpenAiCompatibleGateway::new(
            format!("{}/v1", server.uri()),
            Some("secret".to_string()),
            "KEY",
        );
        let reply = gateway.generate("evaluate this", "openai/gpt-4.1").await.unwrap();
        assert_eq!(reply, r#"{"vote": "YES"}"#);
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let gateway = OpenAiCompatibleGateway::new(server.uri(), Some("k".to_string()), "KEY");
        let err = gateway.generate("p", "m").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::HttpStatus {
                status: 429,
                body: "slow down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let gateway = OpenAiCompatibleGateway::new(server.uri(), Some("k".to_string()), "KEY");
        assert!(matches!(
            gateway.generate("p", "m").await,
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
