//! Configuration loading
//!
//! Coordinates loading configuration from `.env` files, standard environment
//! variables and the command line.

use crate::primitives::ConfigError;

use super::{
    cli::{CliConfig, Commands},
    config::AppConfig,
    env::EnvironmentConfig,
};

/// Env files read before the command line is parsed, first one wins per key
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load `.env.local` and `.env` into the process environment if present
pub fn load_env_files() -> Result<(), ConfigError> {
    for env_file in ENV_FILES {
        if let Err(e) = dotenvy::from_filename(env_file) {
            // Missing files are fine; unreadable or malformed ones are not
            if !e.not_found() {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

impl AppConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::load_with_command()?.0)
    }

    /// Like [`AppConfig::load`], also returning the parsed subcommand
    pub fn load_with_command() -> Result<(Self, Option<Commands>), ConfigError> {
        // 1. Start with defaults
        let mut config = Self::default();

        // 2. .env files feed the CLIENTPACK_* variables clap reads below
        load_env_files()?;

        // 3. Standard environment variables
        let env_config = EnvironmentConfig::load()?;
        config.color = env_config.apply_color_config(config.color);

        // 4. CLI arguments and CLIENTPACK_* variables (highest precedence)
        let cli_config = CliConfig::load()?;
        config = config.merge_with(cli_config.app_config);

        // 5. Post-process and validate
        config.validate()?;

        Ok((config, cli_config.command))
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
