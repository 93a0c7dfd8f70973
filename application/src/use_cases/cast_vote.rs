//! Cast Vote use case
//!
//! One evaluator, one purchase request, one verdict.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use quorum_domain::{EvaluatorProfile, ParseTier, PromptTemplate, PurchaseRequest, ResponseParser, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Verdict plus how it was obtained
#[derive(Debug, Clone)]
pub struct CastVoteOutput {
    pub verdict: Verdict,
    /// Parse tier of the reply, `None` when the gateway call failed
    pub tier: Option<ParseTier>,
}

/// Asks one evaluator for its verdict
///
/// Never fails: a gateway error or timeout becomes an ABSTAIN verdict with a
/// zero risk score, and any reply text becomes a verdict through the
/// [`ResponseParser`].
pub struct Evaluator<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    parser: ResponseParser,
    timeout: Option<Duration>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> Clone for Evaluator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            parser: self.parser,
            timeout: self.timeout,
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl<G: LlmGateway + 'static> Evaluator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_behavior(gateway, &BehaviorConfig::default())
    }

    pub fn with_behavior(gateway: Arc<G>, behavior: &BehaviorConfig) -> Self {
        Self {
            gateway,
            parser: ResponseParser::new(behavior.risk_policy),
            timeout: behavior.timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn conversation_logger(&self) -> &Arc<dyn ConversationLogger> {
        &self.conversation_logger
    }

    /// Get `profile`'s verdict on `request`
    pub async fn vote(&self, profile: &EvaluatorProfile, request: &PurchaseRequest) -> Verdict {
        self.vote_with_tier(profile, request).await.verdict
    }

    /// Like [`Evaluator::vote`], also reporting how the reply was parsed
    pub async fn vote_with_tier(
        &self,
        profile: &EvaluatorProfile,
        request: &PurchaseRequest,
    ) -> CastVoteOutput {
        let prompt = PromptTemplate::evaluation_prompt(request, profile);
        self.conversation_logger.log(ConversationEvent::evaluation_prompt(
            &profile.name,
            &profile.model,
            &prompt,
        ));

        match self.generate(&prompt, &profile.model).await {
            Ok(reply) => {
                let (verdict, tier) = self.parser.parse_with_tier(&reply, profile);
                debug!(
                    agent = %profile.name,
                    tier = tier.as_str(),
                    vote = %verdict.vote,
                    risk = verdict.risk_score,
                    "Evaluator replied"
                );
                self.conversation_logger.log(ConversationEvent::evaluator_reply(
                    &profile.name,
                    &profile.model,
                    &reply,
                    tier.as_str(),
                ));
                CastVoteOutput {
                    verdict,
                    tier: Some(tier),
                }
            }
            Err(e) => {
                warn!("Error getting vote from {}: {}", profile.name, e);
                self.conversation_logger.log(ConversationEvent::evaluator_error(
                    &profile.name,
                    &profile.model,
                    &e.to_string(),
                ));
                CastVoteOutput {
                    verdict: Verdict::from_error(profile, &e),
                    tier: None,
                }
            }
        }
    }

    /// Call the gateway under the configured timeout
    pub(crate) async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError> {
        generate_with_timeout(self.gateway.as_ref(), prompt, model, self.timeout).await
    }
}

/// Gateway call bounded by `timeout`; running out of time is a [`GatewayError::Timeout`]
pub(crate) async fn generate_with_timeout<G: LlmGateway + ?Sized>(
    gateway: &G,
    prompt: &str,
    model: &str,
    timeout: Option<Duration>,
) -> Result<String, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.generate(prompt, model))
            .await
            .map_err(|_| GatewayError::Timeout)?,
        None => gateway.generate(prompt, model).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{ScriptedGateway, vote_json};
    use quorum_domain::{Panel, RiskPolicy, VoteChoice};

    fn cfo() -> EvaluatorProfile {
        Panel::default().profiles()[0].clone()
    }

    fn request() -> PurchaseRequest {
        PurchaseRequest::new(500.0, "OpenAI API credits").with_requesting_agent("CS Agent")
    }

    #[tokio::test]
    async fn test_structured_reply() {
        let gateway = Arc::new(ScriptedGateway::always(&vote_json("YES", 3)));
        let evaluator = Evaluator::new(gateway.clone());

        let output = evaluator.vote_with_tier(&cfo(), &request()).await;
        assert_eq!(output.verdict.vote, VoteChoice::Yes);
        assert_eq!(output.verdict.risk_score, 3);
        assert_eq!(output.verdict.agent_name, "CFO Agent");
        assert_eq!(output.tier, Some(ParseTier::Structured));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "anthropic/claude-sonnet-4-20250514");
        assert!(calls[0].0.contains("Purpose: OpenAI API credits"));
    }

    #[tokio::test]
    async fn test_gateway_failure_abstains() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| {
            Err(GatewayError::ConnectionError("refused".to_string()))
        }));
        let evaluator = Evaluator::new(gateway);

        let output = evaluator.vote_with_tier(&cfo(), &request()).await;
        assert_eq!(output.verdict.vote, VoteChoice::Abstain);
        assert_eq!(output.verdict.risk_score, 0);
        assert_eq!(
            output.verdict.reasoning,
            "Error occurred: Connection error: refused"
        );
        assert!(output.verdict.conditions.is_empty());
        assert_eq!(output.tier, None);
    }

    #[tokio::test]
    async fn test_timeout_abstains() {
        let gateway = Arc::new(
            ScriptedGateway::always(&vote_json("YES", 2)).with_delay(Duration::from_millis(200)),
        );
        let behavior = BehaviorConfig {
            timeout: Some(Duration::from_millis(10)),
            ..BehaviorConfig::default()
        };
        let evaluator = Evaluator::with_behavior(gateway, &behavior);

        let verdict = evaluator.vote(&cfo(), &request()).await;
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.reasoning, "Error occurred: Timeout");
        assert_eq!(verdict.risk_score, 0);
    }

    #[tokio::test]
    async fn test_keyword_reply() {
        let gateway = Arc::new(ScriptedGateway::always("Honestly, yes, go for it."));
        let evaluator = Evaluator::new(gateway);

        let output = evaluator.vote_with_tier(&cfo(), &request()).await;
        assert_eq!(output.verdict.vote, VoteChoice::Yes);
        assert_eq!(output.verdict.risk_score, 5);
        assert_eq!(output.tier, Some(ParseTier::Keyword));
    }

    #[tokio::test]
    async fn test_risk_policy_is_applied() {
        let gateway = Arc::new(ScriptedGateway::always(&vote_json("NO", 42)));

        let clamped = Evaluator::new(gateway.clone()).vote(&cfo(), &request()).await;
        assert_eq!(clamped.risk_score, 10);

        let behavior = BehaviorConfig::default().with_risk_policy(RiskPolicy::PassThrough);
        let raw = Evaluator::with_behavior(gateway, &behavior)
            .vote(&cfo(), &request())
            .await;
        assert_eq!(raw.risk_score, 42);
    }
}
