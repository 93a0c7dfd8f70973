//! Presentation layer for spend-quorum
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP API.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, EvaluateArgs, OutputArg, ServeArgs, SimulateArgs};
pub use cli::demo::{demo_agents, demo_scenarios};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::{ApiError, ApiState, router, serve};
