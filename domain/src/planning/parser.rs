//! Turning the planner's free-text reply into an [`ActionPlan`]

use super::action::{ActionPlan, PlannedAction};
use crate::core::string::first_chars;
use crate::quorum::parsing::{DEFAULT_REASONING, REASONING_PREVIEW_CHARS, extract_braced};
use serde_json::Value;

/// Result of parsing a planner reply
#[derive(Debug, Clone, PartialEq)]
pub struct PlanParse {
    pub plan: ActionPlan,
    /// False when no JSON object could be decoded and the raw text was kept
    pub structured: bool,
    /// Action entries that were dropped because they were malformed
    pub skipped_actions: usize,
}

/// Parse a planner reply.
///
/// The first `{` through the last `}` is decoded as JSON. When that fails
/// the plan is empty and its reasoning is the first 200 characters of the
/// raw reply. Entries of `actions` that are not a recognizable
/// REQUEST_PURCHASE, HIRE_AGENT or COMPLETE object are skipped and counted.
pub fn parse_action_plan(raw: &str) -> PlanParse {
    let object = extract_braced(raw)
        .and_then(|slice| serde_json::from_str::<Value>(slice).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        });

    let Some(object) = object else {
        return PlanParse {
            plan: ActionPlan::empty(first_chars(raw, REASONING_PREVIEW_CHARS)),
            structured: false,
            skipped_actions: 0,
        };
    };

    let reasoning = match object.get("reasoning") {
        Some(Value::String(s)) => s.clone(),
        _ => DEFAULT_REASONING.to_string(),
    };

    let entries = match object.get("actions") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };

    let mut actions = Vec::with_capacity(entries.len());
    let mut skipped_actions = 0;
    for entry in entries {
        match serde_json::from_value::<PlannedAction>(entry.clone()) {
            Ok(action) => actions.push(action),
            Err(_) => skipped_actions += 1,
        }
    }

    PlanParse {
        plan: ActionPlan::new(reasoning, actions),
        structured: true,
        skipped_actions,
    }
}
