//! Process-level plumbing shared by the catalog binaries: layered configuration,
//! logging initialization and shutdown signal handling.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{
    default_logging_config, AppConfig, CliArgs, ConfigError, DatabaseConfig, LoggingConfig,
    Section, ServerConfig,
};
pub use shutdown::{shutdown_token, wait_for_shutdown};
