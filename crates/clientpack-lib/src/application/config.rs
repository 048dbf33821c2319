//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::client::ClientLayout;
use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
    pub const NPM: &str = "npm";
    pub const URL_PREFIX: &str = "../";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorIntent {
        ColorIntent::Auto
    }

    pub fn npm() -> String {
        defaults::NPM.to_string()
    }

    pub fn url_prefix() -> String {
        defaults::URL_PREFIX.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Working directory holding the client template and build config
    #[arg(short, long, env = "CLIENTPACK_WORKDIR")]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Client template directory (default: <workdir>/app)
    #[arg(long, env = "CLIENTPACK_APP_DIR")]
    #[serde(default)]
    pub app_dir: Option<PathBuf>,

    /// Live output directory (default: <app_dir>/build)
    #[arg(long, env = "CLIENTPACK_BUILD_DIR")]
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Directory of contributor declarations (default: <workdir>/contributors)
    #[arg(long, env = "CLIENTPACK_CONTRIB_DIR")]
    #[serde(default)]
    pub contrib_dir: Option<PathBuf>,

    /// Package manager executable
    #[arg(long, env = "CLIENTPACK_NPM", default_value = defaults::NPM)]
    #[serde(default = "default_fns::npm")]
    pub npm: String,

    /// Prefix for module URLs
    #[arg(long, env = "CLIENTPACK_URL_PREFIX", default_value = defaults::URL_PREFIX)]
    #[serde(default = "default_fns::url_prefix")]
    pub url_prefix: String,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "CLIENTPACK_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, pretty)
    #[arg(long, env = "CLIENTPACK_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "CLIENTPACK_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "CLIENTPACK_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorIntent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            app_dir: None,
            build_dir: None,
            contrib_dir: None,
            npm: default_fns::npm(),
            url_prefix: default_fns::url_prefix(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            color: self.color.resolve(),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        // For Option fields, take other if it's Some
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }
        if other.app_dir.is_some() {
            self.app_dir = other.app_dir;
        }
        if other.build_dir.is_some() {
            self.build_dir = other.build_dir;
        }
        if other.contrib_dir.is_some() {
            self.contrib_dir = other.contrib_dir;
        }

        // For primitive fields, take other if it's not the default
        if other.npm != default_fns::npm() {
            self.npm = other.npm;
        }
        if other.url_prefix != default_fns::url_prefix() {
            self.url_prefix = other.url_prefix;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }

        // For enums, detect if it's non-default
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::CurrentDirError { source: e })?;

        let workdir = match self.workdir.take() {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd,
        };
        if !workdir.is_dir() {
            return Err(ConfigError::InvalidWorkDir {
                path: workdir.display().to_string(),
            });
        }
        self.workdir = Some(workdir);

        Ok(())
    }

    /// Working directory, falling back to `.` before validation
    pub fn workdir(&self) -> &Path {
        self.workdir.as_deref().unwrap_or(Path::new("."))
    }

    /// Resolve every client path against the working directory
    pub fn layout(&self) -> ClientLayout {
        let workdir = self.workdir();
        let mut layout = ClientLayout::for_workdir(workdir);

        if let Some(app_dir) = &self.app_dir {
            layout.app_dir = workdir.join(app_dir);
            layout.build_dir = layout.app_dir.join("build");
        }
        if let Some(build_dir) = &self.build_dir {
            layout.build_dir = workdir.join(build_dir);
        }
        if let Some(contrib_dir) = &self.contrib_dir {
            layout.contrib_dir = workdir.join(contrib_dir);
        }
        layout.url_prefix = self.url_prefix.clone();

        layout
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
