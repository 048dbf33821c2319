//! Command session architecture
//!
//! Implements the Session-Scoped Dependency Injection Pattern.
//! Each command execution creates a session that owns all ephemeral state.

use crate::application::config::AppConfig;
use crate::display::{DisplayProvider, LiveDisplayProvider, StyleManager};
use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::path::Path;

/// Process execution output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ProcessOutput {
    /// Exit code 0 with the given stdout
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// Non-zero exit with the given stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

/// Provider trait for process execution
pub trait ProcessProvider {
    /// Execute a command with given arguments in working directory
    ///
    /// A non-zero exit is reported through `ProcessOutput`; `Err` means the
    /// process could not be run at all.
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput>;
}

/// Provider trait for configuration access
pub trait ConfigProvider {
    /// Get the application configuration
    fn app_config(&self) -> &AppConfig;
}

/// Session trait that both CommandSession and MockCommandSession implement
pub trait Session {
    /// Get the display provider for this session
    fn display(&self) -> &dyn DisplayProvider;

    /// Get the process provider for this session
    fn process(&self) -> &dyn ProcessProvider;

    /// Get the config provider for this session
    fn config(&self) -> &dyn ConfigProvider;
}

/// Live implementation of ProcessProvider
#[derive(Debug, Clone, Default)]
pub struct LiveProcessProvider {
    /// Custom PATH override for hermetic testing
    custom_path: Option<String>,
}

impl LiveProcessProvider {
    /// Create a new LiveProcessProvider with system PATH
    pub fn new() -> Self {
        Self { custom_path: None }
    }

    /// Create a LiveProcessProvider with custom PATH for hermetic testing
    pub fn with_custom_path(path: String) -> Self {
        Self {
            custom_path: Some(path),
        }
    }

    /// Create a LiveProcessProvider that finds test executables in `test_bin_path` first
    pub fn new_for_test(test_bin_path: Option<String>) -> Self {
        match test_bin_path {
            Some(bin_path) => {
                let current_path = std::env::var("PATH").unwrap_or_default();
                #[cfg(windows)]
                let path_sep = ";";
                #[cfg(not(windows))]
                let path_sep = ":";
                Self::with_custom_path(format!("{}{}{}", bin_path, path_sep, current_path))
            }
            None => Self::new(),
        }
    }

    /// PATH override, if any
    pub fn custom_path(&self) -> Option<&str> {
        self.custom_path.as_deref()
    }

    /// Resolve a bare program name against the custom PATH.
    ///
    /// `Command` looks programs up in the parent's PATH, not the one passed
    /// through `env`, so the override has to be applied here.
    fn resolve_program(&self, command: &str) -> std::path::PathBuf {
        let Some(custom_path) = &self.custom_path else {
            return command.into();
        };
        if command.contains(std::path::MAIN_SEPARATOR) || command.contains('/') {
            return command.into();
        }

        std::env::split_paths(custom_path)
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| command.into())
    }
}

impl ProcessProvider for LiveProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        use std::process::Command;

        let mut cmd = Command::new(self.resolve_program(command));
        cmd.args(args).current_dir(working_dir);

        // Set custom PATH if specified
        if let Some(custom_path) = &self.custom_path {
            cmd.env("PATH", custom_path);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute command: {}", command))?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

/// Live implementation of ConfigProvider
pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Command session that owns all providers for one command execution
pub struct CommandSession<P, C>
where
    P: ProcessProvider,
    C: ConfigProvider,
{
    /// Display provider for this session
    display_provider: LiveDisplayProvider,
    /// Process execution provider
    process_provider: P,
    /// Configuration provider
    config_provider: C,
}

impl CommandSession<LiveProcessProvider, LiveConfigProvider> {
    /// Create a new command session with owned state (production composition)
    pub fn new(app_config: AppConfig) -> Self {
        let logger_config = app_config.to_logger_config();
        let colors = logger_config.color;
        let _ = crate::logger::Logger::init(logger_config);

        let multi_progress = MultiProgress::new();
        let display_provider =
            LiveDisplayProvider::new_with_multi_progress(&multi_progress, StyleManager::new(colors));

        Self {
            display_provider,
            process_provider: LiveProcessProvider::new(),
            config_provider: LiveConfigProvider::new(app_config),
        }
    }
}

impl<P, C> CommandSession<P, C>
where
    P: ProcessProvider,
    C: ConfigProvider,
{
    /// Create a new generic command session with custom providers (for testing)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_with_providers(process_provider: P, config_provider: C) -> Self {
        Self {
            display_provider: LiveDisplayProvider::new(StyleManager::plain()),
            process_provider,
            config_provider,
        }
    }
}

impl<P, C> Session for CommandSession<P, C>
where
    P: ProcessProvider,
    C: ConfigProvider,
{
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
    }

    fn process(&self) -> &dyn ProcessProvider {
        &self.process_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
