//! Built-in demonstration data for the `scenarios` and `simulation` commands

use quorum_domain::{PurchaseRequest, TaskRequest, Urgency};

/// Three purchase requests of differing merit, each with a short title
pub fn demo_scenarios() -> Vec<(&'static str, PurchaseRequest)> {
    vec![
        (
            "Reasonable API Subscription",
            PurchaseRequest::new(500.0, "OpenAI API credits for customer support chatbot")
                .with_requesting_agent("Customer Service Agent")
                .with_justification(
                    "Our support tickets have increased 300% this month. An AI chatbot could handle 70% of common questions, reducing response time from 4 hours to instant.",
                )
                .with_expected_roi(
                    "Save $3,000/month in support costs, improve customer satisfaction scores",
                )
                .with_urgency(Urgency::High)
                .with_budget_remaining(10_000.0),
        ),
        (
            "Questionable Expense",
            PurchaseRequest::new(5000.0, "Premium Slack workspace with all add-ons")
                .with_requesting_agent("Internal Comms Agent")
                .with_justification(
                    "Team communication could be better. Premium features include better search and more integrations.",
                )
                .with_expected_roi("Improved team communication")
                .with_urgency(Urgency::Low)
                .with_budget_remaining(10_000.0),
        ),
        (
            "Strategic Investment",
            PurchaseRequest::new(2000.0, "Anthropic Claude API Enterprise plan")
                .with_requesting_agent("Product Development Agent")
                .with_justification(
                    "Need advanced AI capabilities for new product feature that competitors don't have. Early access to latest models could give us 6-month competitive advantage.",
                )
                .with_expected_roi("Potential $50K+ in new customer revenue if feature succeeds")
                .with_urgency(Urgency::Medium)
                .with_budget_remaining(10_000.0),
        ),
    ]
}

/// Three autonomous agents with their own goals and budgets
pub fn demo_agents() -> Vec<TaskRequest> {
    vec![
        TaskRequest::new(
            "Marketing Agent Alpha",
            "Launch a new product landing page and ad campaign to acquire 1000 users",
            5000.0,
        ),
        TaskRequest::new(
            "Product Agent Beta",
            "Build and deploy an AI-powered search feature for our app",
            3000.0,
        ),
        TaskRequest::new(
            "Customer Success Agent Gamma",
            "Reduce support ticket response time from 4 hours to under 1 hour",
            2000.0,
        ),
    ]
}
