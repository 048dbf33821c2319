//! Mock implementations of the session providers for testing

use crate::application::config::AppConfig;
use crate::application::session::{
    ConfigProvider, ProcessOutput, ProcessProvider, Session,
};
use crate::display::{DisplayProvider, MockDisplayProvider};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

type CallKey = (String, Vec<String>);
type SideEffect = Box<dyn Fn(&Path) -> Result<()>>;

/// Record of a process execution call for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCall {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Mock process provider for testing
///
/// Records every call. Unconfigured calls succeed with empty output.
#[derive(Default)]
pub struct MockProcessProvider {
    pub calls: RefCell<Vec<ProcessCall>>,
    pub results: HashMap<CallKey, std::result::Result<ProcessOutput, String>>,
    side_effects: HashMap<CallKey, SideEffect>,
}

impl MockProcessProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(
        mut self,
        command: String,
        args: Vec<String>,
        result: std::result::Result<ProcessOutput, String>,
    ) -> Self {
        self.results.insert((command, args), result);
        self
    }

    /// Run `effect` in the working directory whenever the call matches
    pub fn with_side_effect<F>(mut self, command: &str, args: &[&str], effect: F) -> Self
    where
        F: Fn(&Path) -> Result<()> + 'static,
    {
        self.side_effects.insert(key(command, args), Box::new(effect));
        self
    }

    /// Get all recorded process calls for verification
    pub fn get_calls(&self) -> Vec<ProcessCall> {
        self.calls.borrow().clone()
    }

    /// Get calls for a specific command
    pub fn get_calls_for_command(&self, command: &str) -> Vec<ProcessCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.command == command)
            .cloned()
            .collect()
    }
}

fn key(command: &str, args: &[&str]) -> CallKey {
    (
        command.to_string(),
        args.iter().map(|s| s.to_string()).collect(),
    )
}

impl ProcessProvider for MockProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        self.calls.borrow_mut().push(ProcessCall {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        });

        let key = key(command, args);
        if let Some(effect) = self.side_effects.get(&key) {
            effect(working_dir)?;
        }

        match self.results.get(&key) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(e)) => Err(anyhow::anyhow!("{}", e)),
            None => Ok(ProcessOutput::succeeded("")),
        }
    }
}

/// Mock config provider for testing
pub struct MockConfigProvider {
    pub app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Session with every provider mocked
pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub process_provider: MockProcessProvider,
    pub config_provider: MockConfigProvider,
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            display_provider: MockDisplayProvider::new(),
            process_provider: MockProcessProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig::default()),
        }
    }

    pub fn with_process(mut self, process: MockProcessProvider) -> Self {
        self.process_provider = process;
        self
    }

    pub fn with_config(mut self, config: MockConfigProvider) -> Self {
        self.config_provider = config;
        self
    }

    /// Use `app_config` as the session configuration
    pub fn with_app_config(self, app_config: AppConfig) -> Self {
        self.with_config(MockConfigProvider::new(app_config))
    }
}

impl Session for MockCommandSession {
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
