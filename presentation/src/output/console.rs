//! Console output formatter for decisions and task outcomes

use crate::output::formatter::{OutputFormatter, to_json};
use colored::Colorize;
use quorum_application::SimulationReport;
use quorum_domain::purchase::format_amount;
use quorum_domain::{ActionOutcome, Decision, TaskOutcome, Verdict, VoteChoice};

/// Formats decisions and task outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a decision with every verdict
    pub fn format_decision(decision: &Decision) -> String {
        let mut output = String::new();
        let request = &decision.request;

        output.push_str(&Self::header("Purchase Evaluation"));
        output.push('\n');

        output.push_str(&format!(
            "{} ${} for {}\n",
            "Request:".cyan().bold(),
            format_amount(request.amount),
            request.purpose
        ));
        if !request.requesting_agent.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Requested by:".cyan().bold(),
                request.requesting_agent
            ));
        }
        output.push_str(&format!(
            "{} {}  {} ${}\n",
            "Urgency:".cyan().bold(),
            request.urgency,
            "Budget:".cyan().bold(),
            format_amount(request.budget_remaining)
        ));

        output.push_str(&Self::section_header("Panel Verdicts"));
        for verdict in &decision.verdicts {
            output.push_str(&Self::format_verdict(verdict));
        }

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&Self::decision_line(decision));
        output.push_str(&Self::footer());

        output
    }

    /// Format the decision line and counts only
    pub fn format_decision_summary(decision: &Decision) -> String {
        format!(
            "{} ${} for {}\n{}",
            decision.vote_summary(),
            format_amount(decision.request.amount),
            decision.request.purpose,
            Self::decision_line(decision)
        )
    }

    /// Format a task outcome with every action
    pub fn format_task(outcome: &TaskOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&outcome.agent));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), outcome.goal));
        output.push_str(&format!(
            "\n{}\n{}\n",
            "Plan:".cyan().bold(),
            Self::indent(&outcome.reasoning, "  ")
        ));

        output.push_str(&Self::section_header("Actions"));
        if outcome.actions_taken.is_empty() {
            output.push_str(&format!("{}\n", "  (no actions)".dimmed()));
        }
        for (i, action) in outcome.actions_taken.iter().enumerate() {
            output.push_str(&format!("\n{}. {}\n", i + 1, Self::action_line(action)));
            output.push_str(&format!(
                "   {} {} YES, {} NO, {} ABSTAIN  (risk {:.2}/10)\n",
                action.decision.vote_summary(),
                action.decision.yes_votes,
                action.decision.no_votes,
                action.decision.abstain_votes,
                action.decision.average_risk_score
            ));
        }

        output.push_str(&Self::section_header("Budget"));
        output.push_str(&Self::budget_lines(outcome));
        output.push_str(&Self::footer());

        output
    }

    /// Format one line per action and the budget
    pub fn format_task_summary(outcome: &TaskOutcome) -> String {
        let mut output = format!("{}\n", outcome.agent.bold());
        for action in &outcome.actions_taken {
            output.push_str(&format!("  {}\n", Self::action_line(action)));
        }
        output.push_str(&Self::budget_lines(outcome));
        output
    }

    /// Format totals across a simulation
    pub fn format_simulation(report: &SimulationReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Simulation Summary"));
        for outcome in &report.outcomes {
            output.push_str(&format!(
                "  {:<32} spent ${:<10} remaining ${}\n",
                outcome.agent,
                format_amount(outcome.total_spent),
                format_amount(outcome.budget_remaining)
            ));
        }
        output.push_str(&format!(
            "\n{} {} approved, {} denied, ${} spent\n",
            "Total:".bold(),
            report.approved_actions().to_string().green(),
            report.denied_actions().to_string().red(),
            format_amount(report.total_spent())
        ));
        output
    }

    /// Format as JSON
    pub fn format_json<T: serde::Serialize>(value: &T) -> String {
        to_json(value)
    }

    fn format_verdict(verdict: &Verdict) -> String {
        let vote = match verdict.vote {
            VoteChoice::Yes => "YES".green().bold(),
            VoteChoice::No => "NO".red().bold(),
            VoteChoice::Abstain => "ABSTAIN".yellow().bold(),
        };
        let mut output = format!(
            "\n{} {} {}  {}\n",
            verdict.label,
            format!("── {} ──", verdict.agent_name).yellow().bold(),
            vote,
            format!("risk {}/10", verdict.risk_score).dimmed()
        );
        output.push_str(&format!("{}\n", Self::indent(&verdict.reasoning, "  ")));
        if !verdict.conditions.trim().is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Conditions:".cyan(),
                verdict.conditions
            ));
        }
        output
    }

    fn decision_line(decision: &Decision) -> String {
        let verdict = if decision.approved {
            "PURCHASE APPROVED".green().bold()
        } else {
            "PURCHASE DENIED".red().bold()
        };
        format!(
            "{}\nVotes: {} YES, {} NO, {} ABSTAIN ({} needed)\nAverage Risk Score: {:.2}/10\n",
            verdict,
            decision.yes_votes,
            decision.no_votes,
            decision.abstain_votes,
            decision.rule.min_approvals_needed(decision.total_votes()),
            decision.average_risk_score
        )
    }

    fn action_line(action: &ActionOutcome) -> String {
        let status = if action.approved {
            "APPROVED".green().bold()
        } else {
            "DENIED".red().bold()
        };
        format!(
            "[{}] {} (${})",
            status,
            action.title(),
            format_amount(action.requested_amount)
        )
    }

    fn budget_lines(outcome: &TaskOutcome) -> String {
        let remaining = format!("${}", format_amount(outcome.budget_remaining));
        let remaining = if outcome.is_over_budget() {
            remaining.red().bold()
        } else {
            remaining.normal()
        };
        format!(
            "Total spent: ${}\nBudget remaining: {}\n",
            format_amount(outcome.total_spent),
            remaining
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_decision(&self, decision: &Decision) -> String {
        Self::format_decision(decision)
    }

    fn format_decision_summary(&self, decision: &Decision) -> String {
        Self::format_decision_summary(decision)
    }

    fn format_task(&self, outcome: &TaskOutcome) -> String {
        Self::format_task(outcome)
    }

    fn format_task_summary(&self, outcome: &TaskOutcome) -> String {
        Self::format_task_summary(outcome)
    }

    fn format_simulation(&self, report: &SimulationReport) -> String {
        Self::format_simulation(report)
    }
}
