//! CLI entrypoint for Spend Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use quorum_application::{
    ActionPlanner, ConsensusEngine, ConversationLogger, Evaluator, InMemoryResultLog, NoProgress,
    ProgressNotifier, RunSimulationUseCase,
};
use quorum_domain::{OutputFormat, PurchaseRequest};
use quorum_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiCompatibleGateway,
};
use quorum_presentation::{
    ApiState, Cli, Command, ConsoleFormatter, EvaluateArgs, OutputFormatter, ProgressReporter,
    SimpleProgress, demo_agents, demo_scenarios, router, serve,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

type Planner = ActionPlanner<OpenAiCompatibleGateway>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting Spend Quorum");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color || format == OutputFormat::Json {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatibleGateway::from_config(&config.gateway));
    if !gateway.has_api_key() {
        warn!(
            "{} is not set; every evaluator will abstain",
            config.gateway.api_key_env
        );
    }

    let mut evaluator = Evaluator::with_behavior(gateway, &config.behavior_config());
    if let Some(path) = &cli.transcript {
        let logger = JsonlConversationLogger::new(path)
            .with_context(|| format!("Cannot open transcript file {}", path.display()))?;
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        evaluator = evaluator.with_conversation_logger(logger);
    }

    let engine = ConsensusEngine::new(
        evaluator,
        config.panel()?,
        Arc::new(InMemoryResultLog::new()),
    );
    let planner = ActionPlanner::new(Arc::new(engine), config.planner_config());

    // Interleaved evaluations make a single bar unreadable
    let concurrent =
        config.planner.concurrent_actions || matches!(cli.command, Command::Simulation);
    let progress: Box<dyn ProgressNotifier> = if cli.quiet || format == OutputFormat::Json {
        Box::new(NoProgress)
    } else if concurrent {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let formatter = ConsoleFormatter;

    match cli.command {
        Command::Evaluate(args) => {
            let request = read_request(&args)?;
            let decision = planner
                .engine()
                .evaluate_with_progress(request, progress.as_ref())
                .await?;
            println!("{}", formatter.render_decision(&decision, format));
        }
        Command::Simulate(args) => {
            let outcome = planner
                .complete_task_with_progress(args.task_request(), progress.as_ref())
                .await?;
            println!("{}", formatter.render_task(&outcome, format));
        }
        Command::Scenarios => {
            run_scenarios(&planner, progress.as_ref(), format).await?;
        }
        Command::Simulation => {
            if !cli.quiet && format != OutputFormat::Json {
                println!("Three agents are attempting to complete their goals...\n");
            }
            let report = RunSimulationUseCase::new(&planner)
                .execute_with_progress(demo_agents(), progress.as_ref())
                .await?;
            println!("{}", formatter.render_simulation(&report, format));
        }
        Command::Serve(args) => {
            let bind = match args.bind {
                Some(bind) => bind,
                None => config.bind_addr()?.to_string(),
            };
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind to {}", bind))?;
            let app = router(ApiState::new(Arc::new(planner)));
            serve(listener, app).await?;
        }
        Command::ShowConfig => show_config(cli.no_config, cli.config.as_deref(), &config)?,
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over the `-v` count. With `--log-file`, the same events
/// are also appended to that file through a non-blocking writer.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Request from `--request <file>` or from the individual flags
fn read_request(args: &EvaluateArgs) -> Result<PurchaseRequest> {
    if let Some(request) = args.purchase_request() {
        return Ok(request);
    }
    let Some(path) = &args.request else {
        bail!("Either --request or both --amount and --purpose are required");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid request in {}", path.display()))
}

async fn run_scenarios(
    planner: &Planner,
    progress: &dyn ProgressNotifier,
    format: OutputFormat,
) -> Result<()> {
    let mut decisions = Vec::new();
    for (i, (title, request)) in demo_scenarios().into_iter().enumerate() {
        if format != OutputFormat::Json {
            println!("\nSCENARIO {}: {}", i + 1, title);
        }
        let decision = planner
            .engine()
            .evaluate_with_progress(request, progress)
            .await?;
        if format == OutputFormat::Json {
            decisions.push(decision);
        } else {
            println!("{}", ConsoleFormatter.render_decision(&decision, format));
        }
    }
    if format == OutputFormat::Json {
        println!("{}", ConsoleFormatter::format_json(&decisions));
    }
    Ok(())
}

fn show_config(no_config: bool, explicit: Option<&Path>, config: &FileConfig) -> Result<()> {
    if no_config {
        println!("Configuration files disabled (--no-config)");
    } else {
        ConfigLoader::print_config_sources(explicit);
    }

    let panel = config.panel()?;
    println!();
    println!("Gateway: {} (key from {})", config.gateway.base_url, config.gateway.api_key_env);
    println!("Planner: {}", config.planner.model);
    println!(
        "Quorum:  {} ({} of {})",
        panel.rule().description(),
        panel.quorum_threshold(),
        panel.len()
    );
    println!("Panel:");
    for profile in panel.profiles() {
        println!("  {} {:<24} {}", profile.label, profile.name, profile.model);
    }
    Ok(())
}
