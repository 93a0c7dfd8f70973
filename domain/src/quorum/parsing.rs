//! Verdict parsing for evaluator replies.
//!
//! Evaluators answer in free text that is *supposed* to contain a JSON
//! object. This module turns that text into a [`Verdict`] and never fails:
//! malformed replies degrade through three tiers, first success wins.
//!
//! | Tier | Taken when | Vote | Reasoning | Risk |
//! |------|------------|------|-----------|------|
//! | [`ParseTier::Structured`] | first `{` .. last `}` decodes to an object | `vote` field | `reasoning` field | `risk_score` field |
//! | [`ParseTier::Keyword`] | no brace pair, or the slice is not a JSON object | `YES` / `NO` substring | first 200 chars | 5 |
//! | [`ParseTier::Fallback`] | the object decodes but a field has an unusable type | ABSTAIN | first 200 chars | 5 |
//!
//! These functions are pure domain logic: no I/O, no shared state. Parsing
//! the same text twice yields the same verdict.

use super::vote::{NEUTRAL_RISK_SCORE, Verdict, VoteChoice};
use crate::core::string::first_chars;
use crate::panel::EvaluatorProfile;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How many characters of the raw reply are kept as reasoning on fallback tiers
pub const REASONING_PREVIEW_CHARS: usize = 200;

/// Reasoning used when a structured reply omits the field
pub const DEFAULT_REASONING: &str = "No reasoning provided";

const MIN_RISK_SCORE: i64 = 0;
const MAX_RISK_SCORE: i64 = 10;

/// Which parsing tier produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTier {
    Structured,
    Keyword,
    Fallback,
}

impl ParseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTier::Structured => "structured",
            ParseTier::Keyword => "keyword",
            ParseTier::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ParseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What to do with a structured `risk_score` outside `0..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// Clamp into `0..=10` (default)
    #[default]
    Clamp,
    /// Keep whatever the evaluator said, even 99 or -3
    PassThrough,
}

impl RiskPolicy {
    fn apply(&self, score: i64) -> i64 {
        match self {
            RiskPolicy::Clamp => score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE),
            RiskPolicy::PassThrough => score,
        }
    }
}

/// A structured reply field had an unusable type
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnusableField;

/// Parser for evaluator replies
///
/// # Example
///
/// ```
/// use quorum_domain::panel::Panel;
/// use quorum_domain::quorum::{ParseTier, ResponseParser, VoteChoice};
///
/// let panel = Panel::default();
/// let parser = ResponseParser::default();
///
/// let (verdict, tier) = parser.parse_with_tier(
///     r#"Sure! {"vote": "NO", "risk_score": 3}"#,
///     &panel.profiles()[0],
/// );
/// assert_eq!(tier, ParseTier::Structured);
/// assert_eq!(verdict.vote, VoteChoice::No);
/// assert_eq!(verdict.reasoning, "No reasoning provided");
///
/// let (verdict, tier) = parser.parse_with_tier("blah YES blah", &panel.profiles()[0]);
/// assert_eq!(tier, ParseTier::Keyword);
/// assert_eq!(verdict.vote, VoteChoice::Yes);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    risk_policy: RiskPolicy,
}

impl ResponseParser {
    pub fn new(risk_policy: RiskPolicy) -> Self {
        Self { risk_policy }
    }

    pub fn risk_policy(&self) -> RiskPolicy {
        self.risk_policy
    }

    /// Parse a raw reply into a verdict attributed to `profile`
    pub fn parse(&self, raw: &str, profile: &EvaluatorProfile) -> Verdict {
        self.parse_with_tier(raw, profile).0
    }

    /// Parse a raw reply, also reporting which tier produced the verdict
    pub fn parse_with_tier(&self, raw: &str, profile: &EvaluatorProfile) -> (Verdict, ParseTier) {
        if let Some(object) = extract_braced(raw).and_then(decode_object) {
            return match self.structured_verdict(&object, profile) {
                Ok(verdict) => (verdict, ParseTier::Structured),
                Err(_) => (fallback_verdict(raw, profile), ParseTier::Fallback),
            };
        }

        (keyword_verdict(raw, profile), ParseTier::Keyword)
    }

    fn structured_verdict(
        &self,
        object: &Map<String, Value>,
        profile: &EvaluatorProfile,
    ) -> Result<Verdict, UnusableField> {
        let vote = match present(object, "vote") {
            None => VoteChoice::Abstain,
            Some(Value::String(s)) => VoteChoice::from_reply(s),
            Some(_) => return Err(UnusableField),
        };

        let reasoning = text_field(object, "reasoning")?
            .unwrap_or_else(|| DEFAULT_REASONING.to_string());

        let risk_score = match present(object, "risk_score") {
            None => NEUTRAL_RISK_SCORE,
            Some(value) => self
                .risk_policy
                .apply(numeric_score(value).ok_or(UnusableField)?),
        };

        let conditions = text_field(object, "conditions")?.unwrap_or_default();

        Ok(Verdict::new(profile, vote, reasoning, risk_score, conditions))
    }
}

/// Parse a reply with the default [`RiskPolicy`]
pub fn parse_verdict(raw: &str, profile: &EvaluatorProfile) -> Verdict {
    ResponseParser::default().parse(raw, profile)
}

/// Slice from the first `{` to the last `}` (inclusive).
///
/// Returns `None` when either brace is missing or the last `}` comes before
/// the first `{`.
pub fn extract_braced(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn decode_object(slice: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(slice) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// A field counts as absent when missing or explicitly `null`
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn text_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, UnusableField> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        // Some models answer `"conditions": ["a", "b"]`
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(|parts| Some(parts.join("; ")))
            .ok_or(UnusableField),
        Some(_) => Err(UnusableField),
    }
}

fn numeric_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
        _ => None,
    }
}

fn keyword_verdict(raw: &str, profile: &EvaluatorProfile) -> Verdict {
    let upper = raw.to_uppercase();
    let vote = if upper.contains("YES") {
        VoteChoice::Yes
    } else if upper.contains("NO") {
        VoteChoice::No
    } else {
        VoteChoice::Abstain
    };

    Verdict::new(
        profile,
        vote,
        first_chars(raw, REASONING_PREVIEW_CHARS),
        NEUTRAL_RISK_SCORE,
        "",
    )
}

fn fallback_verdict(raw: &str, profile: &EvaluatorProfile) -> Verdict {
    Verdict::new(
        profile,
        VoteChoice::Abstain,
        first_chars(raw, REASONING_PREVIEW_CHARS),
        NEUTRAL_RISK_SCORE,
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> EvaluatorProfile {
        EvaluatorProfile::new(
            "CFO Agent",
            "Conservative financial oversight",
            "anthropic/claude-sonnet-4-20250514",
            "persona",
            "💼",
        )
    }

    fn parse(raw: &str) -> (Verdict, ParseTier) {
        ResponseParser::default().parse_with_tier(raw, &profile())
    }

    // ==================== Structured tier ====================

    #[test]
    fn test_structured_full_reply() {
        let raw = r#"{"vote": "YES", "reasoning": "Clear ROI", "risk_score": 3, "conditions": "Review in 90 days"}"#;
        let (verdict, tier) = parse(raw);
        assert_eq!(tier, ParseTier::Structured);
        assert_eq!(verdict.vote, VoteChoice::Yes);
        assert_eq!(verdict.reasoning, "Clear ROI");
        assert_eq!(verdict.risk_score, 3);
        assert_eq!(verdict.conditions, "Review in 90 days");
        assert_eq!(verdict.agent_name, "CFO Agent");
        assert_eq!(verdict.model, "anthropic/claude-sonnet-4-20250514");
    }

    #[test]
    fn test_structured_defaults_missing_fields() {
        let (verdict, tier) = parse(r#"{"vote":"NO","risk_score":3}"#);
        assert_eq!(tier, ParseTier::Structured);
        assert_eq!(verdict.vote, VoteChoice::No);
        assert_eq!(verdict.risk_score, 3);
        assert_eq!(verdict.reasoning, DEFAULT_REASONING);
        assert_eq!(verdict.conditions, "");
    }

    #[test]
    fn test_structured_empty_object() {
        let (verdict, tier) = parse("{}");
        assert_eq!(tier, ParseTier::Structured);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.risk_score, NEUTRAL_RISK_SCORE);
        assert_eq!(verdict.reasoning, DEFAULT_REASONING);
    }

    #[test]
    fn test_structured_inside_prose_and_code_fence() {
        let raw = "Here is my analysis:\n```json\n{\"vote\": \"yes\", \"reasoning\": \"ok\", \"risk_score\": 4}\n```\nThanks!";
        let (verdict, tier) = parse(raw);
        assert_eq!(tier, ParseTier::Structured);
        assert_eq!(verdict.vote, VoteChoice::Yes);
        assert_eq!(verdict.risk_score, 4);
    }

    #[test]
    fn test_structured_unknown_vote_is_abstain() {
        let (verdict, _) = parse(r#"{"vote": "CONDITIONAL", "risk_score": 6}"#);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.risk_score, 6);
    }

    #[test]
    fn test_structured_null_fields_use_defaults() {
        let (verdict, tier) = parse(r#"{"vote": null, "reasoning": null, "risk_score": null}"#);
        assert_eq!(tier, ParseTier::Structured);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.reasoning, DEFAULT_REASONING);
        assert_eq!(verdict.risk_score, NEUTRAL_RISK_SCORE);
    }

    #[test]
    fn test_structured_numeric_string_and_float_scores() {
        assert_eq!(parse(r#"{"vote": "YES", "risk_score": "7"}"#).0.risk_score, 7);
        assert_eq!(parse(r#"{"vote": "YES", "risk_score": 6.6}"#).0.risk_score, 7);
    }

    #[test]
    fn test_structured_conditions_array_joined() {
        let (verdict, _) = parse(r#"{"vote": "YES", "conditions": ["Cap at $400", "Monthly review"]}"#);
        assert_eq!(verdict.conditions, "Cap at $400; Monthly review");
    }

    // ==================== Risk policy ====================

    #[test]
    fn test_risk_score_clamped_by_default() {
        assert_eq!(parse(r#"{"vote": "NO", "risk_score": 99}"#).0.risk_score, 10);
        assert_eq!(parse(r#"{"vote": "NO", "risk_score": -3}"#).0.risk_score, 0);
    }

    #[test]
    fn test_risk_score_pass_through() {
        let parser = ResponseParser::new(RiskPolicy::PassThrough);
        let verdict = parser.parse(r#"{"vote": "NO", "risk_score": 99}"#, &profile());
        assert_eq!(verdict.risk_score, 99);
        let verdict = parser.parse(r#"{"vote": "NO", "risk_score": -3}"#, &profile());
        assert_eq!(verdict.risk_score, -3);
    }

    // ==================== Keyword tier ====================

    #[test]
    fn test_keyword_yes_without_braces() {
        let (verdict, tier) = parse("blah YES blah");
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.vote, VoteChoice::Yes);
        assert_eq!(verdict.reasoning, "blah YES blah");
        assert_eq!(verdict.risk_score, NEUTRAL_RISK_SCORE);
        assert_eq!(verdict.conditions, "");
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_prefers_yes() {
        assert_eq!(parse("i say yes, not no").0.vote, VoteChoice::Yes);
        assert_eq!(parse("definitely no").0.vote, VoteChoice::No);
        assert_eq!(parse("I decline to decide").0.vote, VoteChoice::Abstain);
    }

    #[test]
    fn test_keyword_matches_substrings() {
        // "NO" inside "KNOW" still counts, like a plain substring search
        assert_eq!(parse("I don't know").0.vote, VoteChoice::No);
    }

    #[test]
    fn test_unbalanced_open_brace_falls_to_keyword() {
        let (verdict, tier) = parse("{vote: yes");
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.vote, VoteChoice::Yes);
    }

    #[test]
    fn test_no_open_brace_falls_to_keyword() {
        let (_, tier) = parse("vote: no }");
        assert_eq!(tier, ParseTier::Keyword);
    }

    #[test]
    fn test_close_before_open_falls_to_keyword() {
        let (verdict, tier) = parse("} NO {");
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.vote, VoteChoice::No);
    }

    #[test]
    fn test_braces_that_do_not_decode_fall_to_keyword() {
        let (verdict, tier) = parse("{vote: YES, risk: low}");
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.vote, VoteChoice::Yes);
        assert_eq!(verdict.risk_score, NEUTRAL_RISK_SCORE);
    }

    #[test]
    fn test_keyword_reasoning_truncated_to_200_chars() {
        let raw = format!("NO {}", "x".repeat(500));
        let (verdict, tier) = parse(&raw);
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.reasoning.chars().count(), REASONING_PREVIEW_CHARS);
    }

    #[test]
    fn test_empty_reply() {
        let (verdict, tier) = parse("");
        assert_eq!(tier, ParseTier::Keyword);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.reasoning, "");
    }

    // ==================== Fallback tier ====================

    #[test]
    fn test_non_string_vote_is_fallback() {
        let (verdict, tier) = parse(r#"{"vote": true, "reasoning": "YES indeed"}"#);
        assert_eq!(tier, ParseTier::Fallback);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
        assert_eq!(verdict.risk_score, NEUTRAL_RISK_SCORE);
        assert_eq!(verdict.reasoning, r#"{"vote": true, "reasoning": "YES indeed"}"#);
    }

    #[test]
    fn test_non_numeric_risk_is_fallback() {
        let (verdict, tier) = parse(r#"{"vote": "YES", "risk_score": "low"}"#);
        assert_eq!(tier, ParseTier::Fallback);
        assert_eq!(verdict.vote, VoteChoice::Abstain);
    }

    #[test]
    fn test_object_reasoning_is_fallback() {
        let (_, tier) = parse(r#"{"vote": "YES", "reasoning": {"text": "nested"}}"#);
        assert_eq!(tier, ParseTier::Fallback);
    }

    // ==================== Helpers ====================

    #[test]
    fn test_extract_braced() {
        assert_eq!(extract_braced("a {b} c"), Some("{b}"));
        assert_eq!(extract_braced("{a} and {b}"), Some("{a} and {b}"));
        assert_eq!(extract_braced("no braces"), None);
        assert_eq!(extract_braced("{ open only"), None);
        assert_eq!(extract_braced("close only }"), None);
        assert_eq!(extract_braced("} backwards {"), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let inputs = [
            r#"{"vote": "YES", "reasoning": "ok", "risk_score": 2}"#,
            "blah NO blah",
            r#"{"vote": 1}"#,
            "",
        ];
        for raw in inputs {
            assert_eq!(parse(raw), parse(raw));
        }
    }

    #[test]
    fn test_parse_verdict_uses_default_policy() {
        let verdict = parse_verdict(r#"{"vote": "YES", "risk_score": 42}"#, &profile());
        assert_eq!(verdict.risk_score, 10);
    }
}
