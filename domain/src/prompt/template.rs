//! Prompt templates for evaluation and planning

use crate::panel::EvaluatorProfile;
use crate::purchase::{PurchaseRequest, format_amount};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt sent to one evaluator for one purchase request
    pub fn evaluation_prompt(request: &PurchaseRequest, profile: &EvaluatorProfile) -> String {
        format!(
            r#"PURCHASE REQUEST:
Amount: ${amount}
Purpose: {purpose}
Requesting Agent: {agent}
Justification: {justification}
Expected ROI: {roi}
Urgency: {urgency}
Current Budget Remaining: ${budget}

YOUR ROLE: {role}
YOUR PERSONA: {persona}

Analyze this purchase request and provide:
1. Your vote (YES or NO)
2. Your reasoning (2-3 sentences)
3. A risk score from 1-10 (1 = very safe, 10 = very risky)
4. Any conditions for approval

Format your response as JSON:
{{
    "vote": "YES" or "NO",
    "reasoning": "your detailed reasoning here",
    "risk_score": 5,
    "conditions": "any conditions or empty string"
}}"#,
            amount = format_amount(request.amount),
            purpose = request.purpose,
            agent = request.requesting_agent,
            justification = request.justification,
            roi = request.expected_roi,
            urgency = request.urgency,
            budget = format_amount(request.budget_remaining),
            role = profile.role,
            persona = profile.persona,
        )
    }

    /// Prompt asking the planner to break a goal into purchases and hires
    pub fn planning_prompt(agent_name: &str, goal: &str, budget: f64) -> String {
        format!(
            r#"You are {agent_name}. Your goal is: {goal}

You have a budget of ${budget}.

You have access to a PAYMENT TOOL that requires consensus approval.
When you need to make a purchase, you must:
1. Identify what you need to buy
2. Justify why you need it
3. Estimate the ROI
4. Submit a purchase request

Available actions:
- REQUEST_PURCHASE: Submit a purchase for consensus approval
- HIRE_AGENT: Hire another specialized agent for help
- COMPLETE: Task is done

Think step by step about what you need to accomplish this goal.
What purchases or agent hires do you need to make?

Respond in JSON format:
{{
    "reasoning": "your thinking process",
    "actions": [
        {{
            "type": "REQUEST_PURCHASE",
            "amount": 500,
            "purpose": "OpenAI API credits",
            "justification": "Need AI capabilities for feature",
            "expected_roi": "10x ROI from new customers"
        }},
        {{
            "type": "HIRE_AGENT",
            "agent_type": "Design Agent",
            "amount": 300,
            "task": "Create landing page",
            "justification": "Need professional design",
            "expected_roi": "Better conversion rates"
        }}
    ]
}}"#,
            budget = format_amount(budget),
        )
    }
}
