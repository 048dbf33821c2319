use crate::primitives::ConfigError;
use clap::{Parser, Subcommand};

use super::config::AppConfig;

/// clientpack CLI - browser asset bundle management
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "clientpack")]
#[command(about = "Build and publish a client bundle from contributed JS dependencies")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// clientpack commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        let cli = Cli::parse();
        Ok(Self {
            app_config: cli.config,
            command: cli.command,
        })
    }
}

/// Contributor name used for packages passed on the command line
pub const DEFAULT_CONTRIBUTOR: &str = "app";

/// Available clientpack commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Register packages, discover contributors and rebuild the client
    Build {
        /// npm package specs to register before building
        #[arg(help = "npm packages to add, e.g. left-pad@^1.3.0 or @scope/pkg")]
        packages: Vec<String>,

        /// Contributor the packages are registered under
        #[arg(long, default_value = DEFAULT_CONTRIBUTOR)]
        contributor: String,
    },

    /// Rebuild the pristine client template and forget all aliases
    Restore,

    /// List registered dependencies and their aliases
    List,

    /// Run contributor discovery without building
    Discover,

    /// Show the export names of a built module
    Exports {
        /// Contributor that declared the package
        contributor: String,
        /// Package spec as declared
        package: String,
    },

    /// Show the URL of a built module
    Url {
        /// Contributor that declared the package
        contributor: String,
        /// Package spec as declared
        package: String,
    },

    /// Resolve a path relative to the client build directory
    Path {
        /// Relative path, `/`-separated
        relative_path: String,
    },

    /// Show version information
    Version,
}

impl Commands {
    /// Whether the command runs the external package manager
    pub fn runs_external_tools(&self) -> bool {
        matches!(self, Commands::Build { .. } | Commands::Restore)
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
