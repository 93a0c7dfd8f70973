//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use quorum_domain::{DEFAULT_TASK_BUDGET, OutputFormat, PurchaseRequest, TaskRequest, Urgency};
use std::path::PathBuf;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Every verdict with reasoning, followed by the decision
    Full,
    /// Only the decision and vote counts
    Summary,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Summary => OutputFormat::Summary,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for spend-quorum
#[derive(Parser, Debug)]
#[command(name = "spend-quorum")]
#[command(author, version, about = "Purchase approval by a panel of five AI evaluators")]
#[command(long_about = r#"
Spend Quorum puts every purchase request in front of a panel of five
differently-minded evaluators. Each votes YES, NO or ABSTAIN with a risk
score; a strict majority of YES votes approves the purchase.

Autonomous agents can also plan purchases and agent hires toward a goal,
with every action going through the same vote.

Configuration files are loaded from (in priority order):
1. QUORUM_* environment variables
2. --config <path>     Explicit config file
3. ./quorum.toml       Project-level config
4. ~/.config/spend-quorum/config.toml   Global config

Example:
  spend-quorum evaluate --amount 500 --purpose "OpenAI API credits" --urgency high
  spend-quorum simulate --agent "Product Agent" --goal "Ship AI search" --budget 3000
  spend-quorum serve --bind 0.0.0.0:5001
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to the configured one, then "full")
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write tracing output to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Write every prompt and reply as JSON lines to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Put one purchase request in front of the panel
    Evaluate(EvaluateArgs),

    /// Let one autonomous agent plan and request purchases toward a goal
    Simulate(SimulateArgs),

    /// Evaluate the three built-in demonstration requests
    Scenarios,

    /// Run the three built-in autonomous agents concurrently
    Simulation,

    /// Start the HTTP API
    Serve(ServeArgs),

    /// Show configuration file locations and the effective panel
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Amount to spend, in dollars
    #[arg(long, required_unless_present = "request")]
    pub amount: Option<f64>,

    /// What the money is for
    #[arg(long, required_unless_present = "request")]
    pub purpose: Option<String>,

    /// Name of the requesting agent
    #[arg(long, default_value = "CLI")]
    pub agent: String,

    /// Why the purchase is needed
    #[arg(long, default_value = "")]
    pub justification: String,

    /// Expected return on investment
    #[arg(long)]
    pub roi: Option<String>,

    /// low, medium or high
    #[arg(long)]
    pub urgency: Option<Urgency>,

    /// Budget remaining before this purchase
    #[arg(long)]
    pub budget: Option<f64>,

    /// Read the whole request from a JSON file instead
    #[arg(long, value_name = "FILE", conflicts_with_all = ["amount", "purpose"])]
    pub request: Option<PathBuf>,
}

impl EvaluateArgs {
    /// Build the request from flags; `None` when `--request` is used instead
    pub fn purchase_request(&self) -> Option<PurchaseRequest> {
        let (amount, purpose) = (self.amount?, self.purpose.as_ref()?);

        let mut request = PurchaseRequest::new(amount, purpose.clone())
            .with_requesting_agent(self.agent.clone())
            .with_justification(self.justification.clone())
            .with_urgency(self.urgency.unwrap_or_default());
        if let Some(roi) = &self.roi {
            request = request.with_expected_roi(roi.clone());
        }
        if let Some(budget) = self.budget {
            request = request.with_budget_remaining(budget);
        }
        Some(request)
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Agent name
    #[arg(long)]
    pub agent: String,

    /// The goal the agent works toward
    #[arg(long)]
    pub goal: String,

    /// Budget the agent starts with
    #[arg(long, default_value_t = DEFAULT_TASK_BUDGET)]
    pub budget: f64,
}

impl SimulateArgs {
    pub fn task_request(&self) -> TaskRequest {
        TaskRequest::new(self.agent.clone(), self.goal.clone(), self.budget)
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (defaults to server.bind from the configuration)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_from_flags() {
        let cli = Cli::try_parse_from([
            "spend-quorum",
            "evaluate",
            "--amount",
            "500",
            "--purpose",
            "OpenAI API credits",
            "--urgency",
            "high",
            "--budget",
            "2500",
        ])
        .unwrap();

        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        let request = args.purchase_request().unwrap();
        assert_eq!(request.amount, 500.0);
        assert_eq!(request.purpose, "OpenAI API credits");
        assert_eq!(request.requesting_agent, "CLI");
        assert_eq!(request.urgency, Urgency::High);
        assert_eq!(request.expected_roi, "Not specified");
        assert_eq!(request.budget_remaining, 2500.0);
    }

    #[test]
    fn test_evaluate_requires_amount_or_file() {
        assert!(Cli::try_parse_from(["spend-quorum", "evaluate", "--purpose", "x"]).is_err());

        let cli =
            Cli::try_parse_from(["spend-quorum", "evaluate", "--request", "req.json"]).unwrap();
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert!(args.purchase_request().is_none());
        assert_eq!(args.request, Some(PathBuf::from("req.json")));
    }

    #[test]
    fn test_request_file_conflicts_with_flags() {
        let result = Cli::try_parse_from([
            "spend-quorum",
            "evaluate",
            "--request",
            "req.json",
            "--amount",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_urgency_rejected() {
        let result = Cli::try_parse_from([
            "spend-quorum",
            "evaluate",
            "--amount",
            "5",
            "--purpose",
            "x",
            "--urgency",
            "whenever",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_simulate_default_budget() {
        let cli = Cli::try_parse_from([
            "spend-quorum",
            "simulate",
            "--agent",
            "Beta",
            "--goal",
            "Ship search",
        ])
        .unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.task_request().budget, 5000.0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["spend-quorum", "scenarios", "-vv", "--output", "json"])
            .unwrap();
        assert!(matches!(cli.command, Command::Scenarios));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Json));
    }

    #[test]
    fn test_serve_bind() {
        let cli = Cli::try_parse_from(["spend-quorum", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
    }
}
