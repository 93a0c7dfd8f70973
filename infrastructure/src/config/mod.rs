//! Configuration file loading for spend-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./quorum.toml` or `./.quorum.toml`
//! 4. Global: `~/.config/spend-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_BIND,
    FileBehaviorConfig, FileConfig, FileEvaluatorConfig, FileGatewayConfig, FileOutputConfig,
    FileOutputFormat, FilePlannerConfig, FileQuorumConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
