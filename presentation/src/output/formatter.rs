//! Output formatter trait

use quorum_application::SimulationReport;
use quorum_domain::{Decision, OutputFormat, TaskOutcome};

/// Trait for formatting decisions and task outcomes
pub trait OutputFormatter {
    /// Every verdict with reasoning, then the decision
    fn format_decision(&self, decision: &Decision) -> String;

    /// Decision line and vote counts only
    fn format_decision_summary(&self, decision: &Decision) -> String;

    /// Plan reasoning, every action with its decision, then the spend totals
    fn format_task(&self, outcome: &TaskOutcome) -> String;

    /// One line per action plus the spend totals
    fn format_task_summary(&self, outcome: &TaskOutcome) -> String;

    /// Totals across every agent of a simulation
    fn format_simulation(&self, report: &SimulationReport) -> String;

    fn render_decision(&self, decision: &Decision, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_decision(decision),
            OutputFormat::Summary => self.format_decision_summary(decision),
            OutputFormat::Json => to_json(decision),
        }
    }

    fn render_task(&self, outcome: &TaskOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_task(outcome),
            OutputFormat::Summary => self.format_task_summary(outcome),
            OutputFormat::Json => to_json(outcome),
        }
    }

    fn render_simulation(&self, report: &SimulationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Full => {
                let mut output = String::new();
                for outcome in &report.outcomes {
                    output.push_str(&self.format_task(outcome));
                }
                output.push_str(&self.format_simulation(report));
                output
            }
            OutputFormat::Summary => {
                let mut output = String::new();
                for outcome in &report.outcomes {
                    output.push_str(&self.format_task_summary(outcome));
                }
                output.push_str(&self.format_simulation(report));
                output
            }
        }
    }
}

/// Pretty JSON, or `{}` if the value cannot be serialized
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
