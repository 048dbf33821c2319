//! # clientpack Library
//!
//! Builds and publishes a browser client bundle from JS dependencies declared
//! by independent contributors.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and shared coordination
//! - [`logger`] - Structured logging with progress tracking
//! - [`display`] - Status lines and spinners for terminal output
//! - [`client`] - Alias store, discovery, staged rebuilds and artifact lookups
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! // Initialize and run clientpack
//! clientpack_lib::main().unwrap();
//! ```

pub mod application;
pub mod client;
pub mod display;
pub mod logger;
pub mod primitives;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use client::{
    BuildArtifacts, BuildError, BuildOrchestrator, ConfigStore, ContributorRegistry,
    DependencyEntry,
};
pub use logger::Logger;
pub use primitives::{ColorIntent, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub fn main() -> Result<()> {
    // Load configuration: defaults, env files, environment, then CLI
    let (app_config, command) = AppConfig::load_with_command()?;

    // Execute the command
    execute_command(CliConfig {
        app_config,
        command,
    })
}
