//! Progress reporting for panel evaluations and agent tasks

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use quorum_application::ProgressNotifier;
use quorum_domain::purchase::format_amount;
use quorum_domain::{
    ActionOutcome, ActionPlan, Decision, ParseTier, PurchaseRequest, TaskOutcome, TaskRequest,
    Verdict, VoteChoice,
};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct PanelBar {
    bar: Option<ProgressBar>,
    /// Evaluations started but not yet decided
    in_flight: usize,
}

/// Reports progress with a progress bar over outstanding verdicts
///
/// Overlapping evaluations (concurrent actions, several agents) share one
/// bar: each evaluation adds its panel size to the length, and the bar is
/// finished once the last outstanding decision arrives.
pub struct ProgressReporter {
    multi: MultiProgress,
    panel: Mutex<PanelBar>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            panel: Mutex::new(PanelBar::default()),
        }
    }

    fn panel_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn state(&self) -> MutexGuard<'_, PanelBar> {
        self.panel.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn println(&self, line: String) {
        // Only fails when the terminal is gone
        let _ = self.multi.println(line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_evaluation_start(&self, request: &PurchaseRequest, panel_size: usize) {
        let mut state = self.state();
        state.in_flight += 1;
        match &state.bar {
            Some(bar) => bar.inc_length(panel_size as u64),
            None => {
                let bar = self.multi.add(ProgressBar::new(panel_size as u64));
                bar.set_style(Self::panel_style());
                bar.set_prefix("Panel voting");
                bar.set_message(format!("${} {}", format_amount(request.amount), request.purpose));
                state.bar = Some(bar);
            }
        }
    }

    fn on_verdict(&self, verdict: &Verdict, _tier: Option<ParseTier>) {
        if let Some(bar) = self.state().bar.as_ref() {
            bar.set_message(format!("{} {}", vote_mark(verdict.vote), verdict.agent_name));
            bar.inc(1);
        }
    }

    fn on_decision(&self, decision: &Decision) {
        let mut state = self.state();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0
            && let Some(bar) = state.bar.take()
        {
            bar.finish_and_clear();
        }
        drop(state);

        self.println(format!(
            "{} {} ${} {}",
            decision_mark(decision),
            decision.vote_summary(),
            format_amount(decision.request.amount),
            decision.request.purpose
        ));
    }

    fn on_plan_ready(&self, task: &TaskRequest, plan: &ActionPlan) {
        self.println(format!(
            "{} {} planned {} action(s)",
            "->".cyan(),
            task.agent_name.bold(),
            plan.actions.len()
        ));
    }

    fn on_task_complete(&self, outcome: &TaskOutcome) {
        self.println(format!(
            "{} {} done: ${} spent, ${} remaining",
            "v".green(),
            outcome.agent.bold(),
            format_amount(outcome.total_spent),
            format_amount(outcome.budget_remaining)
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_evaluation_start(&self, request: &PurchaseRequest, panel_size: usize) {
        println!(
            "{} {} ({} evaluators)",
            "->".cyan(),
            format!("${} for {}", format_amount(request.amount), request.purpose).bold(),
            panel_size
        );
    }

    fn on_verdict(&self, verdict: &Verdict, tier: Option<ParseTier>) {
        let tier = tier.map_or_else(|| "unreachable".to_string(), |t| t.to_string());
        println!(
            "  {} {} {} (risk {}, {})",
            vote_mark(verdict.vote),
            verdict.agent_name,
            verdict.vote,
            verdict.risk_score,
            tier
        );
    }

    fn on_decision(&self, decision: &Decision) {
        println!(
            "  {} {}/{} YES\n",
            decision_mark(decision),
            decision.yes_votes,
            decision.total_votes()
        );
    }

    fn on_plan_ready(&self, task: &TaskRequest, plan: &ActionPlan) {
        println!(
            "{} {} planned {} action(s)",
            "->".cyan(),
            task.agent_name.bold(),
            plan.actions.len()
        );
    }

    fn on_action_complete(&self, task: &TaskRequest, outcome: &ActionOutcome) {
        println!(
            "  {} {}: {}",
            if outcome.approved { "v".green() } else { "x".red() },
            task.agent_name,
            outcome.title()
        );
    }

    fn on_task_complete(&self, outcome: &TaskOutcome) {
        println!(
            "{} {} finished with ${} remaining\n",
            "v".green(),
            outcome.agent.bold(),
            format_amount(outcome.budget_remaining)
        );
    }
}

fn vote_mark(vote: VoteChoice) -> colored::ColoredString {
    match vote {
        VoteChoice::Yes => "v".green(),
        VoteChoice::No => "x".red(),
        VoteChoice::Abstain => "-".yellow(),
    }
}

fn decision_mark(decision: &Decision) -> colored::ColoredString {
    if decision.approved {
        "APPROVED".green().bold()
    } else {
        "DENIED".red().bold()
    }
}
